use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{self, Claims};
use crate::AppState;

/// Verified identity extracted from a bearer token: subject name plus admin
/// flag. Produced at most once per request and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Authentication middleware, run on every request.
///
/// If a bearer token was provided and verifies, the identity is stored as a
/// request extension for the gate policies and handlers downstream. A
/// missing, malformed, expired, or badly-signed token is not an error: the
/// request simply proceeds without an identity, and any policy stricter
/// than open-to-all will deny it.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(identity) = identity_from_headers(request.headers(), &state.config.auth.secret_key)
    {
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}

fn identity_from_headers(headers: &HeaderMap, secret: &str) -> Option<Identity> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = strip_bearer(header)?;
    let claims = auth::verify_token(token, secret).ok()?;
    Some(Identity::from(claims))
}

fn strip_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
