use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use crate::database::bind_value_as;
use crate::error::ApiError;
use crate::sql::{self, columns, FieldMap};

const JOB_RETURNING: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Job {
    /// Create a job, returning the stored row.
    ///
    /// Fails with 400 when the company already lists a job with this title.
    /// The insert itself goes through the insert builder, so only the
    /// provided optional fields appear in the statement.
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, ApiError> {
        let duplicate = sqlx::query_scalar::<_, String>(
            "SELECT company_handle FROM jobs WHERE title = $1 AND company_handle = $2",
        )
        .bind(&data.title)
        .bind(&data.company_handle)
        .fetch_optional(pool)
        .await?;
        if duplicate.is_some() {
            return Err(ApiError::bad_request(format!(
                "Duplicate job: {}",
                data.title
            )));
        }

        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), Value::String(data.title));
        if let Some(salary) = data.salary {
            fields.insert("salary".to_string(), Value::from(salary));
        }
        if let Some(equity) = data.equity {
            // Bound as float; Postgres assigns it to the NUMERIC column.
            let equity = equity.to_f64().unwrap_or(0.0);
            fields.insert("equity".to_string(), Value::from(equity));
        }
        fields.insert(
            "companyHandle".to_string(),
            Value::String(data.company_handle),
        );
        let insert = sql::build_insert(&fields, columns::JOB_INSERT_COLUMNS)?;

        let query_sql = format!(
            "INSERT INTO jobs {} VALUES {} RETURNING {JOB_RETURNING}",
            insert.columns, insert.placeholders
        );
        let mut query = sqlx::query_as::<_, Job>(&query_sql);
        for param in &insert.params {
            query = bind_value_as(query, param);
        }
        let job = query.fetch_one(pool).await?;
        Ok(job)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Job>, ApiError> {
        let jobs =
            sqlx::query_as::<_, Job>(&format!("SELECT {JOB_RETURNING} FROM jobs ORDER BY title"))
                .fetch_all(pool)
                .await?;
        Ok(jobs)
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_RETURNING} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", id)))
    }

    /// Partial update by id. The id and company handle are not editable;
    /// both sit outside the update allowlist, so a body naming them is a
    /// 400 before any SQL is assembled.
    pub async fn update(pool: &PgPool, id: i32, fields: FieldMap) -> Result<Job, ApiError> {
        sql::ensure_allowed_keys(&fields, columns::JOB_UPDATE_FIELDS)?;
        let fragment = sql::build_update(&fields, columns::JOB_UPDATE_COLUMNS)?;

        let query_sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {JOB_RETURNING}",
            fragment.clause,
            fragment.params.len() + 1
        );
        let mut query = sqlx::query_as::<_, Job>(&query_sql);
        for param in &fragment.params {
            query = bind_value_as(query, param);
        }
        query
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No job: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), ApiError> {
        let deleted = sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(ApiError::not_found(format!("No job: {}", id))),
        }
    }

    /// Filtered search over title (substring), minimum salary, and the
    /// has-equity flag. A filter set that normalizes away entirely (e.g.
    /// only `hasEquity=false`) falls back to the unfiltered listing.
    pub async fn search(pool: &PgPool, filters: FieldMap) -> Result<Vec<Job>, ApiError> {
        sql::ensure_allowed_keys(&filters, columns::JOB_FILTER_FIELDS)?;
        let filters = sql::normalize_filter_values(filters, columns::JOB_FILTER_RULES);
        if filters.is_empty() {
            return Self::find_all(pool).await;
        }
        let fragment = sql::build_filter(&filters, columns::JOB_FILTER_COLUMNS)?;

        let query_sql = format!(
            "SELECT {JOB_RETURNING} FROM jobs WHERE {} ORDER BY title",
            fragment.clause
        );
        let mut query = sqlx::query_as::<_, Job>(&query_sql);
        for param in &fragment.params {
            query = bind_value_as(query, param);
        }
        let jobs = query.fetch_all(pool).await?;
        Ok(jobs)
    }
}
