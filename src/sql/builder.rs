use super::error::QueryError;
use super::types::{column_for, ColumnMap, FieldMap, InsertFragment, SqlFragment};

/// Build the SET clause of a partial UPDATE.
///
/// Each key in `fields` is resolved through `columns` (falling back to the
/// raw key when unmapped) and emitted as `"<column>"=$<n>` in iteration
/// order, joined with `", "`. The returned params are in the same order, so
/// `$n` always binds `params[n-1]`.
///
/// Callers must have run [`super::validate::ensure_allowed_keys`] first; the
/// fallback here is a naming convenience for whitelisted keys that already
/// match their column, not an escape hatch.
pub fn build_update(fields: &FieldMap, columns: ColumnMap) -> Result<SqlFragment, QueryError> {
    if fields.is_empty() {
        return Err(QueryError::EmptyFieldMap);
    }

    let mut clauses = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());
    for (idx, (field, value)) in fields.iter().enumerate() {
        let column = column_for(columns, field).unwrap_or(field.as_str());
        clauses.push(format!("\"{}\"=${}", column, idx + 1));
        params.push(value.clone());
    }

    Ok(SqlFragment {
        clause: clauses.join(", "),
        params,
    })
}

/// Build the WHERE clause of a filtered SELECT.
///
/// Each key must resolve to a predicate in `columns` (e.g. `name ILIKE`);
/// the fragment emitted is `<predicate> $<n>`, joined with `" AND "`. A key
/// with no mapping is an error: a request-controlled string never reaches
/// the SQL text, only the bind values.
pub fn build_filter(fields: &FieldMap, columns: ColumnMap) -> Result<SqlFragment, QueryError> {
    if fields.is_empty() {
        return Err(QueryError::EmptyFieldMap);
    }

    let mut clauses = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());
    for (idx, (field, value)) in fields.iter().enumerate() {
        let predicate = column_for(columns, field)
            .ok_or_else(|| QueryError::UnknownField(field.clone()))?;
        clauses.push(format!("{} ${}", predicate, idx + 1));
        params.push(value.clone());
    }

    Ok(SqlFragment {
        clause: clauses.join(" AND "),
        params,
    })
}

/// Build the column and placeholder lists of a parameterized INSERT.
///
/// Like [`build_filter`], the mapping is strict: every key must appear in
/// `columns`.
pub fn build_insert(fields: &FieldMap, columns: ColumnMap) -> Result<InsertFragment, QueryError> {
    if fields.is_empty() {
        return Err(QueryError::EmptyFieldMap);
    }

    let mut names = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());
    for (idx, (field, value)) in fields.iter().enumerate() {
        let column = column_for(columns, field)
            .ok_or_else(|| QueryError::UnknownField(field.clone()))?;
        names.push(column);
        placeholders.push(format!("${}", idx + 1));
        params.push(value.clone());
    }

    Ok(InsertFragment {
        columns: format!("({})", names.join(", ")),
        placeholders: format!("({})", placeholders.join(", ")),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn fields(pairs: &[(&str, Value)]) -> FieldMap {
        let mut map = FieldMap::new();
        for (key, value) in pairs {
            map.insert(key.to_string(), value.clone());
        }
        map
    }

    const USER_COLUMNS: ColumnMap = &[
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("isAdmin", "is_admin"),
    ];

    #[test]
    fn update_maps_and_numbers_in_key_order() {
        let data = fields(&[
            ("firstName", json!("User1F")),
            ("lastName", json!("User1L")),
        ]);

        let fragment = build_update(&data, USER_COLUMNS).unwrap();
        assert_eq!(fragment.clause, "\"first_name\"=$1, \"last_name\"=$2");
        assert_eq!(fragment.params, vec![json!("User1F"), json!("User1L")]);
    }

    #[test]
    fn update_falls_back_to_raw_key_when_unmapped() {
        let data = fields(&[("email", json!("u1@mail.com"))]);

        let fragment = build_update(&data, USER_COLUMNS).unwrap();
        assert_eq!(fragment.clause, "\"email\"=$1");
        assert_eq!(fragment.params, vec![json!("u1@mail.com")]);
    }

    #[test]
    fn update_rejects_empty_field_map() {
        let err = build_update(&FieldMap::new(), USER_COLUMNS).unwrap_err();
        assert_eq!(err, QueryError::EmptyFieldMap);
    }

    #[test]
    fn update_placeholder_count_matches_param_count() {
        let data = fields(&[
            ("firstName", json!("a")),
            ("lastName", json!("b")),
            ("email", json!("c")),
            ("isAdmin", json!(true)),
        ]);

        let fragment = build_update(&data, USER_COLUMNS).unwrap();
        let placeholders = fragment.clause.matches('$').count();
        assert_eq!(placeholders, fragment.params.len());
        assert!(fragment.clause.ends_with(&format!("${}", fragment.params.len())));
    }

    #[test]
    fn filter_emits_predicates_joined_with_and() {
        let data = fields(&[("name", json!("%wall%")), ("minEmployees", json!(2))]);
        let columns: ColumnMap = &[("name", "name ILIKE"), ("minEmployees", "num_employees >=")];

        let fragment = build_filter(&data, columns).unwrap();
        assert_eq!(fragment.clause, "name ILIKE $1 AND num_employees >= $2");
        assert_eq!(fragment.params, vec![json!("%wall%"), json!(2)]);
    }

    #[test]
    fn filter_rejects_unmapped_key() {
        let data = fields(&[("bogus", json!(1))]);
        let columns: ColumnMap = &[("name", "name ILIKE")];

        let err = build_filter(&data, columns).unwrap_err();
        assert_eq!(err, QueryError::UnknownField("bogus".to_string()));
    }

    #[test]
    fn filter_rejects_empty_field_map() {
        let columns: ColumnMap = &[("name", "name ILIKE")];
        let err = build_filter(&FieldMap::new(), columns).unwrap_err();
        assert_eq!(err, QueryError::EmptyFieldMap);
    }

    #[test]
    fn insert_builds_matching_column_and_placeholder_lists() {
        let data = fields(&[("username", json!("u1")), ("jobId", json!(7))]);
        let columns: ColumnMap = &[("username", "username"), ("jobId", "job_id")];

        let insert = build_insert(&data, columns).unwrap();
        assert_eq!(insert.columns, "(username, job_id)");
        assert_eq!(insert.placeholders, "($1, $2)");
        assert_eq!(insert.params, vec![json!("u1"), json!(7)]);
    }

    #[test]
    fn insert_rejects_empty_and_unmapped() {
        let columns: ColumnMap = &[("username", "username")];
        assert_eq!(
            build_insert(&FieldMap::new(), columns).unwrap_err(),
            QueryError::EmptyFieldMap
        );

        let data = fields(&[("bogus", json!(1))]);
        assert_eq!(
            build_insert(&data, columns).unwrap_err(),
            QueryError::UnknownField("bogus".to_string())
        );
    }
}
