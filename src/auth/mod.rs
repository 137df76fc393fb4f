use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token payload identifying a subject and their admin flag.
///
/// Wire names are camelCase to match the tokens the API has always issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            username: username.into(),
            is_admin,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    /// Malformed, expired, and badly-signed tokens are all reported as this
    /// one kind; callers treat any of them as "no valid identity".
    #[error("Invalid JWT token: {0}")]
    TokenInvalid(String),
}

pub fn generate_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| JwtError::TokenInvalid(e.to_string()))
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip_preserves_claims() {
        let claims = Claims::new("u1", false, 24);
        let token = generate_token(&claims, SECRET).unwrap();
        let decoded = verify_token(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let claims = Claims::new("u1", true, 24);
        let token = generate_token(&claims, SECRET).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn tampered_token_fails_verification() {
        let claims = Claims::new("u1", false, 24);
        let mut token = generate_token(&claims, SECRET).unwrap();
        token.push('x');
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn expired_token_fails_verification() {
        let claims = Claims {
            username: "u1".to_string(),
            is_admin: false,
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
        };
        let token = generate_token(&claims, SECRET).unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn claims_serialize_with_camel_case_admin_flag() {
        let claims = Claims::new("u4", true, 1);
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["isAdmin"], serde_json::json!(true));
        assert_eq!(value["username"], serde_json::json!("u4"));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }
}
