use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::config::AppConfig;
use crate::database::models::{RegisterUser, User};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/token { username, password } => { token }
///
/// Authorization required: none.
pub async fn token_post(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = User::authenticate(&state.pool, &body.username, &body.password).await?;
    let token = issue_token(&user, &state.config)?;
    Ok(Json(json!({ "token": token })))
}

/// POST /auth/register { username, password, firstName, lastName, email }
/// => { token }
///
/// Self-service registration; the created user is never an admin.
/// Authorization required: none.
pub async fn register_post(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = User::register(&state.pool, body.into(), state.config.auth.bcrypt_cost).await?;
    let token = issue_token(&user, &state.config)?;
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}

pub(crate) fn issue_token(user: &User, config: &AppConfig) -> Result<String, ApiError> {
    let claims = Claims::new(
        user.username.clone(),
        user.is_admin,
        config.auth.token_expiry_hours,
    );
    Ok(auth::generate_token(&claims, &config.auth.secret_key)?)
}
