use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use super::field_map_from_pairs;
use crate::database::models::{Company, NewCompany};
use crate::error::ApiError;
use crate::sql::FieldMap;
use crate::AppState;

/// POST /companies { handle, name, description, numEmployees, logoUrl }
/// => { company }
///
/// Authorization required: admin.
pub async fn companies_post(
    State(state): State<AppState>,
    Json(body): Json<NewCompany>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let company = Company::create(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// GET /companies => { companies: [...] }, or the filtered list when any of
/// the search filters (name, minEmployees, maxEmployees) are provided.
///
/// Authorization required: none.
pub async fn companies_get(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ApiError> {
    let filters = field_map_from_pairs(pairs);
    if filters.is_empty() {
        let companies = Company::find_all(&state.pool).await?;
        return Ok(Json(json!({ "companies": companies })));
    }
    let companies = Company::search(&state.pool, filters).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/:handle => { company, jobs }
///
/// Authorization required: none.
pub async fn companies_get_one(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let (company, jobs) = Company::get(&state.pool, &handle).await?;
    Ok(Json(json!({ "company": company, "jobs": jobs })))
}

/// PATCH /companies/:handle { name?, description?, numEmployees?, logoUrl? }
/// => { company }
///
/// Authorization required: admin.
pub async fn companies_patch(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Json(fields): Json<FieldMap>,
) -> Result<Json<Value>, ApiError> {
    let company = Company::update(&state.pool, &handle, fields).await?;
    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/:handle => { deleted: handle }
///
/// Authorization required: admin.
pub async fn companies_delete(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Company::remove(&state.pool, &handle).await?;
    Ok(Json(json!({ "deleted": handle })))
}
