use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::database::{bind_value_as, models::job::Job};
use crate::error::ApiError;
use crate::sql::{self, columns, FieldMap};

const COMPANY_RETURNING: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Request body for company creation. Unknown fields are rejected at
/// deserialization, the same contract the old JSON-schema layer enforced.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Company {
    /// Create a company, returning the stored row.
    ///
    /// Fails with 400 if the handle is already taken.
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, ApiError> {
        let duplicate =
            sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
                .bind(&data.handle)
                .fetch_optional(pool)
                .await?;
        if duplicate.is_some() {
            return Err(ApiError::bad_request(format!(
                "Duplicate company: {}",
                data.handle
            )));
        }

        let company = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COMPANY_RETURNING}"
        ))
        .bind(&data.handle)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.num_employees)
        .bind(&data.logo_url)
        .fetch_one(pool)
        .await?;

        Ok(company)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Company>, ApiError> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_RETURNING} FROM companies ORDER BY name"
        ))
        .fetch_all(pool)
        .await?;
        Ok(companies)
    }

    /// Fetch one company and its jobs. Fails with 404 if the handle is
    /// unknown.
    pub async fn get(pool: &PgPool, handle: &str) -> Result<(Company, Vec<Job>), ApiError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_RETURNING} FROM companies WHERE handle = $1"
        ))
        .bind(handle)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No company: {}", handle)))?;

        let jobs = sqlx::query_as::<_, Job>(
            "SELECT id, title, salary, equity, company_handle FROM jobs \
             WHERE company_handle = $1 ORDER BY title",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        Ok((company, jobs))
    }

    /// Partial update: only the provided fields change. Keys are validated
    /// against the update allowlist before any SQL is assembled.
    pub async fn update(
        pool: &PgPool,
        handle: &str,
        fields: FieldMap,
    ) -> Result<Company, ApiError> {
        sql::ensure_allowed_keys(&fields, columns::COMPANY_UPDATE_FIELDS)?;
        let fragment = sql::build_update(&fields, columns::COMPANY_UPDATE_COLUMNS)?;

        let query_sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COMPANY_RETURNING}",
            fragment.clause,
            fragment.params.len() + 1
        );
        let mut query = sqlx::query_as::<_, Company>(&query_sql);
        for param in &fragment.params {
            query = bind_value_as(query, param);
        }
        query
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No company: {}", handle)))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), ApiError> {
        let deleted =
            sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
                .bind(handle)
                .fetch_optional(pool)
                .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(ApiError::not_found(format!("No company: {}", handle))),
        }
    }

    /// Filtered search. Key validation, range consistency, and value
    /// normalization run in that order before the WHERE fragment is built.
    ///
    /// Fails with 404 when nothing matches.
    pub async fn search(pool: &PgPool, filters: FieldMap) -> Result<Vec<Company>, ApiError> {
        sql::ensure_allowed_keys(&filters, columns::COMPANY_FILTER_FIELDS)?;
        sql::verify_range(&filters, "minEmployees", "maxEmployees")?;
        let filters = sql::normalize_filter_values(filters, columns::COMPANY_FILTER_RULES);
        if filters.is_empty() {
            return Self::find_all(pool).await;
        }
        let fragment = sql::build_filter(&filters, columns::COMPANY_FILTER_COLUMNS)?;

        let query_sql = format!(
            "SELECT {COMPANY_RETURNING} FROM companies WHERE {} ORDER BY name",
            fragment.clause
        );
        let mut query = sqlx::query_as::<_, Company>(&query_sql);
        for param in &fragment.params {
            query = bind_value_as(query, param);
        }
        let companies = query.fetch_all(pool).await?;

        if companies.is_empty() {
            return Err(ApiError::not_found("No companies found."));
        }
        Ok(companies)
    }
}
