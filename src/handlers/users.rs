use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use super::auth::issue_token;
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::sql::FieldMap;
use crate::AppState;

/// POST /users { user } => { user, token }
///
/// Adds a new user; unlike registration, the body may set the admin flag.
/// Returns the created user and an authentication token for them.
///
/// Authorization required: none.
pub async fn users_post(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = User::register(&state.pool, body, state.config.auth.bcrypt_cost).await?;
    let token = issue_token(&user, &state.config)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user, "token": token })),
    ))
}

/// GET /users => { users }
///
/// Every user, keyed by username, each with the job ids they applied to.
/// Authorization required: admin.
pub async fn users_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = User::find_all(&state.pool).await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /users/:username => { user, jobs }
///
/// Authorization required: same user or admin.
pub async fn users_get_one(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (user, jobs) = User::get(&state.pool, &username).await?;
    Ok(Json(json!({ "user": user, "jobs": jobs })))
}

/// PATCH /users/:username { firstName?, lastName?, password?, email? }
/// => { user }
///
/// Authorization required: same user or admin.
pub async fn users_patch(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(fields): Json<FieldMap>,
) -> Result<Json<Value>, ApiError> {
    let user = User::update(
        &state.pool,
        &username,
        fields,
        state.config.auth.bcrypt_cost,
    )
    .await?;
    Ok(Json(json!({ "user": user })))
}

/// DELETE /users/:username => { deleted: username }
///
/// Authorization required: same user or admin.
pub async fn users_delete(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    User::remove(&state.pool, &username).await?;
    Ok(Json(json!({ "deleted": username })))
}

/// POST /users/:username/jobs/:id => { applied: id }
///
/// Authorization required: same user or admin.
pub async fn users_apply_post(
    State(state): State<AppState>,
    Path((username, id)): Path<(String, i32)>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let applied = User::apply_to_job(&state.pool, &username, id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "applied": applied }))))
}
