use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, PgPool, Row};

use crate::auth::{hash_password, verify_password};
use crate::database::models::application::Application;
use crate::database::models::job::Job;
use crate::database::{bind_value, bind_value_as};
use crate::error::ApiError;
use crate::sql::{self, columns, FieldMap};

const USER_RETURNING: &str = "username, first_name, last_name, email, is_admin";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Internal row shape for credential checks; the hash never leaves this
/// module.
#[derive(Debug, FromRow)]
struct UserWithPassword {
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    email: String,
    is_admin: bool,
}

#[derive(Debug, FromRow)]
struct UserJobRow {
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    is_admin: bool,
    job_id: Option<i32>,
}

/// Admin-facing user creation body; may set the admin flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Self-service registration body; registered users are never admins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<RegisterUser> for NewUser {
    fn from(data: RegisterUser) -> Self {
        Self {
            username: data.username,
            password: data.password,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            is_admin: false,
        }
    }
}

impl User {
    /// Check a username/password pair against the stored hash.
    ///
    /// Unknown user and wrong password are indistinguishable to the caller:
    /// both are 401 with the same message.
    pub async fn authenticate(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT username, password, first_name, last_name, email, is_admin \
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        if let Some(row) = row {
            if verify_password(password, &row.password)? {
                return Ok(User {
                    username: row.username,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    email: row.email,
                    is_admin: row.is_admin,
                });
            }
        }
        Err(ApiError::unauthorized("Invalid username/password"))
    }

    /// Store a new user with a freshly hashed password.
    ///
    /// Fails with 400 on a duplicate username.
    pub async fn register(
        pool: &PgPool,
        data: NewUser,
        bcrypt_cost: u32,
    ) -> Result<User, ApiError> {
        let duplicate =
            sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
                .bind(&data.username)
                .fetch_optional(pool)
                .await?;
        if duplicate.is_some() {
            return Err(ApiError::bad_request(format!(
                "Duplicate username: {}",
                data.username
            )));
        }

        let hashed = hash_password(&data.password, bcrypt_cost)?;
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_RETURNING}"
        ))
        .bind(&data.username)
        .bind(&hashed)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(data.is_admin)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// All users, each carrying the job ids they have applied to, keyed by
    /// username in username order.
    pub async fn find_all(pool: &PgPool) -> Result<serde_json::Map<String, Value>, ApiError> {
        let rows = sqlx::query_as::<_, UserJobRow>(
            "SELECT u.username, u.first_name, u.last_name, u.email, u.is_admin, a.job_id \
             FROM users u \
             LEFT JOIN applications a ON u.username = a.username \
             ORDER BY u.username",
        )
        .fetch_all(pool)
        .await?;

        // One entry per username; a user's second and later join rows only
        // contribute their job id.
        let mut users = serde_json::Map::new();
        for row in rows {
            match users.get_mut(&row.username) {
                Some(Value::Object(entry)) => {
                    if let (Some(Value::Array(jobs)), Some(job_id)) =
                        (entry.get_mut("jobs"), row.job_id)
                    {
                        jobs.push(Value::from(job_id));
                    }
                }
                _ => {
                    let jobs: Vec<i32> = row.job_id.into_iter().collect();
                    users.insert(
                        row.username.clone(),
                        json!({
                            "username": row.username,
                            "firstName": row.first_name,
                            "lastName": row.last_name,
                            "email": row.email,
                            "isAdmin": row.is_admin,
                            "jobs": jobs,
                        }),
                    );
                }
            }
        }
        Ok(users)
    }

    /// One user plus the job ids they have applied to. Fails with 404 for
    /// an unknown username.
    pub async fn get(pool: &PgPool, username: &str) -> Result<(User, Vec<i32>), ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_RETURNING} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))?;

        let jobs =
            sqlx::query_scalar::<_, i32>("SELECT job_id FROM applications WHERE username = $1")
                .bind(username)
                .fetch_all(pool)
                .await?;

        Ok((user, jobs))
    }

    /// Partial update: only the provided fields change. An incoming
    /// password is re-hashed before the fragment is built; the stored hash
    /// is never serialized back to the client.
    pub async fn update(
        pool: &PgPool,
        username: &str,
        mut fields: FieldMap,
        bcrypt_cost: u32,
    ) -> Result<User, ApiError> {
        sql::ensure_allowed_keys(&fields, columns::USER_UPDATE_FIELDS)?;

        if let Some(value) = fields.get("password") {
            let password = value
                .as_str()
                .ok_or_else(|| ApiError::bad_request("password must be a string"))?;
            let hashed = hash_password(password, bcrypt_cost)?;
            fields.insert("password".to_string(), Value::String(hashed));
        }

        let fragment = sql::build_update(&fields, columns::USER_UPDATE_COLUMNS)?;
        let query_sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {USER_RETURNING}",
            fragment.clause,
            fragment.params.len() + 1
        );
        let mut query = sqlx::query_as::<_, User>(&query_sql);
        for param in &fragment.params {
            query = bind_value_as(query, param);
        }
        query
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user: {}", username)))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), ApiError> {
        let deleted = sqlx::query_scalar::<_, String>(
            "DELETE FROM users WHERE username = $1 RETURNING username",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;
        match deleted {
            Some(_) => Ok(()),
            None => Err(ApiError::not_found(format!("No user: {}", username))),
        }
    }

    /// Apply a user to a job: both must exist and the application must not
    /// already be on file. Returns the applied job id.
    pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i32) -> Result<i32, ApiError> {
        Self::get(pool, username).await?;
        Job::get_by_id(pool, job_id).await?;
        Application::ensure_not_applied(pool, job_id, username).await?;

        let mut fields = FieldMap::new();
        fields.insert("username".to_string(), Value::String(username.to_string()));
        fields.insert("jobId".to_string(), Value::from(job_id));
        let insert = sql::build_insert(&fields, columns::APPLICATION_INSERT_COLUMNS)?;

        let query_sql = format!(
            "INSERT INTO applications {} VALUES {} RETURNING job_id",
            insert.columns, insert.placeholders
        );
        let mut query = sqlx::query(&query_sql);
        for param in &insert.params {
            query = bind_value(query, param);
        }
        let row = query.fetch_one(pool).await?;
        let applied: i32 = row.try_get("job_id")?;
        Ok(applied)
    }
}
