pub mod auth;
pub mod policy;

pub use auth::{authenticate, Identity};
pub use policy::{require_admin, require_authenticated, require_self_or_admin, GatePolicy};
