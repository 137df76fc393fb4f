use std::collections::HashMap;

use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};

use super::auth::Identity;
use crate::error::ApiError;

/// The four authorization rules, as pure predicates over the request
/// identity. Verification of the bearer credential happens once in
/// [`super::auth::authenticate`]; every policy only reads the resulting
/// identity slot.
#[derive(Debug, Clone, PartialEq)]
pub enum GatePolicy<'a> {
    OpenToAll,
    Authenticated,
    Admin,
    SelfOrAdmin { subject: &'a str },
}

impl GatePolicy<'_> {
    pub fn allows(&self, identity: Option<&Identity>) -> bool {
        match self {
            GatePolicy::OpenToAll => true,
            GatePolicy::Authenticated => identity.is_some(),
            GatePolicy::Admin => identity.is_some_and(|id| id.is_admin),
            GatePolicy::SelfOrAdmin { subject } => {
                identity.is_some_and(|id| id.is_admin || id.username == *subject)
            }
        }
    }
}

/// Continue iff a verified identity is present.
pub async fn require_authenticated(request: Request, next: Next) -> Result<Response, ApiError> {
    gate(&GatePolicy::Authenticated, &request)?;
    Ok(next.run(request).await)
}

/// Continue iff a verified identity is present and is an admin. Denial is
/// 401, the same as for a missing login; the API does not distinguish the
/// two at the status level.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    gate(&GatePolicy::Admin, &request)?;
    Ok(next.run(request).await)
}

/// Continue iff the verified identity matches the `:username` route
/// parameter or is an admin.
pub async fn require_self_or_admin(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let subject = params.get("username").map(String::as_str).unwrap_or("");
    gate(&GatePolicy::SelfOrAdmin { subject }, &request)?;
    Ok(next.run(request).await)
}

fn gate(policy: &GatePolicy<'_>, request: &Request) -> Result<(), ApiError> {
    let identity = request.extensions().get::<Identity>();
    if policy.allows(identity) {
        Ok(())
    } else {
        tracing::debug!(
            "Gate denied {:?} for {:?} {}",
            policy,
            request.method(),
            request.uri().path()
        );
        Err(ApiError::unauthorized("Unauthorized"))
    }
}
