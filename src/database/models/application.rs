use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub job_id: i32,
    pub username: String,
}

impl Application {
    /// Fails with 400 if the user has already applied to the job.
    pub async fn ensure_not_applied(
        pool: &PgPool,
        job_id: i32,
        username: &str,
    ) -> Result<(), ApiError> {
        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT job_id FROM applications WHERE job_id = $1 AND username = $2",
        )
        .bind(job_id)
        .bind(username)
        .fetch_optional(pool)
        .await?;

        match existing {
            Some(_) => Err(ApiError::bad_request(format!(
                "Already applied to job id: {}.",
                job_id
            ))),
            None => Ok(()),
        }
    }
}
