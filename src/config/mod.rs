use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration, constructed once in `main` and handed to every
/// component through axum state. Nothing outside this module reads the
/// process environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub secret_key: String,
    pub token_expiry_hours: u64,
    /// bcrypt work factor. Kept at the crate minimum in tests, since the
    /// algorithm's safety is not what tests exercise.
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("SECRET_KEY") {
            self.auth.secret_key = v;
        }
        if let Ok(v) = env::var("TOKEN_EXPIRY_HOURS") {
            self.auth.token_expiry_hours = v.parse().unwrap_or(self.auth.token_expiry_hours);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.auth.bcrypt_cost = v.parse().unwrap_or(self.auth.bcrypt_cost);
        }
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3001 },
            database: DatabaseConfig {
                url: "postgres://localhost/jobboard".to_string(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            auth: AuthConfig {
                secret_key: "secret-dev".to_string(),
                token_expiry_hours: 24 * 7,
                bcrypt_cost: 12,
            },
        }
    }

    pub fn test() -> Self {
        Self {
            environment: Environment::Test,
            server: ServerConfig { port: 3001 },
            database: DatabaseConfig {
                url: "postgres://localhost/jobboard_test".to_string(),
                max_connections: 5,
                connect_timeout_secs: 5,
            },
            auth: AuthConfig {
                secret_key: "secret-dev".to_string(),
                token_expiry_hours: 24,
                bcrypt_cost: bcrypt::MIN_COST,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3001 },
            database: DatabaseConfig {
                url: "postgres://localhost/jobboard".to_string(),
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            auth: AuthConfig {
                secret_key: "secret-dev".to_string(),
                token_expiry_hours: 24,
                bcrypt_cost: 12,
            },
        }
    }
}
