use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("No data")]
    EmptyFieldMap,

    #[error("Invalid filter or update field: {0}")]
    UnknownField(String),

    #[error("{min_field} cannot be greater than {max_field}")]
    InvalidRange {
        min_field: String,
        max_field: String,
    },
}
