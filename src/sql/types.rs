use serde_json::{Map, Value};

/// Request-supplied logical field name -> value mapping.
///
/// Built fresh per request from a JSON body or query-string pairs and
/// discarded when the request completes. Iteration order is insertion order
/// (serde_json is compiled with `preserve_order`), which is what fixes the
/// `$1..$N` placeholder numbering the builders emit.
pub type FieldMap = Map<String, Value>;

/// Static logical field name -> physical column name or partial predicate
/// lookup table, e.g. `("minEmployees", "num_employees >=")`.
///
/// One table exists per entity and operation; see [`super::columns`]. All of
/// them are process-wide immutable.
pub type ColumnMap = &'static [(&'static str, &'static str)];

pub fn column_for(columns: ColumnMap, field: &str) -> Option<&'static str> {
    columns
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, physical)| *physical)
}

/// A rendered SQL clause with `$1..$N` placeholders plus the bind values in
/// placeholder order: `params[i]` binds `$i+1`.
#[derive(Debug, Clone)]
pub struct SqlFragment {
    pub clause: String,
    pub params: Vec<Value>,
}

/// The three pieces of a parameterized INSERT: a parenthesized column list,
/// the matching parenthesized placeholder list, and the bind values in the
/// same order.
#[derive(Debug, Clone)]
pub struct InsertFragment {
    pub columns: String,
    pub placeholders: String,
    pub params: Vec<Value>,
}
