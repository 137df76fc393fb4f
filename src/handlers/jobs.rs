use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use super::field_map_from_pairs;
use crate::database::models::{Job, NewJob};
use crate::error::ApiError;
use crate::sql::FieldMap;
use crate::AppState;

/// POST /jobs { title, salary, equity, companyHandle } => { job }
///
/// Authorization required: admin.
pub async fn jobs_post(
    State(state): State<AppState>,
    Json(body): Json<NewJob>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let job = Job::create(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// GET /jobs => { jobs: [...] }, filtered by title, minSalary, and
/// hasEquity when provided.
///
/// Authorization required: none.
pub async fn jobs_get(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let filters = field_map_from_pairs(pairs);
    let jobs = if filters.is_empty() {
        Job::find_all(&state.pool).await?
    } else {
        Job::search(&state.pool, filters).await?
    };
    Ok(Json(json!({ "jobs": jobs })))
}

/// GET /jobs/:id => { job }
///
/// Authorization required: none.
pub async fn jobs_get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let job = Job::get_by_id(&state.pool, id).await?;
    Ok(Json(json!({ "job": job })))
}

/// PATCH /jobs/:id { title?, salary?, equity? } => { job }
///
/// The id and company handle are not editable.
/// Authorization required: admin.
pub async fn jobs_patch(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(fields): Json<FieldMap>,
) -> Result<Json<Value>, ApiError> {
    let job = Job::update(&state.pool, id, fields).await?;
    Ok(Json(json!({ "job": job })))
}

/// DELETE /jobs/:id => { deleted: id }
///
/// Authorization required: admin.
pub async fn jobs_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    Job::remove(&state.pool, id).await?;
    Ok(Json(json!({ "deleted": id })))
}
