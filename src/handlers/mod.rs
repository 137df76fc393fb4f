pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::sql::FieldMap;
use crate::AppState;

/// Fold decoded query-string pairs into a field map, preserving arrival
/// order so placeholder numbering is deterministic.
pub(crate) fn field_map_from_pairs(pairs: Vec<(String, String)>) -> FieldMap {
    let mut fields = FieldMap::new();
    for (key, value) in pairs {
        fields.insert(key, Value::String(value));
    }
    fields
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match crate::database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
