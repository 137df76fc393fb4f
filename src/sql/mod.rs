pub mod builder;
pub mod columns;
pub mod error;
pub mod types;
pub mod validate;

pub use builder::{build_filter, build_insert, build_update};
pub use error::QueryError;
pub use types::{ColumnMap, FieldMap, InsertFragment, SqlFragment};
pub use validate::{
    ensure_allowed_keys, normalize_filter_values, validate_keys, verify_range, NormalizeRule,
};
