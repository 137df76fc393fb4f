//! End-to-end exercises of the filter pipeline through the public API:
//! validate keys, normalize values, build the fragment. Pure string/array
//! work, no database.

use serde_json::{json, Value};

use jobboard_api::sql::{self, columns, FieldMap};

fn fields(pairs: &[(&str, Value)]) -> FieldMap {
    let mut map = FieldMap::new();
    for (key, value) in pairs {
        map.insert(key.to_string(), value.clone());
    }
    map
}

#[test]
fn company_filter_pipeline_builds_ordered_fragment() {
    // Query string arrives as text: ?name=c&minEmployees=2
    let raw = fields(&[("name", json!("c")), ("minEmployees", json!("2"))]);

    assert!(sql::validate_keys(&raw, columns::COMPANY_FILTER_FIELDS));
    sql::verify_range(&raw, "minEmployees", "maxEmployees").unwrap();

    let normalized = sql::normalize_filter_values(raw, columns::COMPANY_FILTER_RULES);
    assert_eq!(normalized.get("name"), Some(&json!("%c%")));
    assert_eq!(normalized.get("minEmployees"), Some(&json!(2)));

    let fragment = sql::build_filter(&normalized, columns::COMPANY_FILTER_COLUMNS).unwrap();
    assert_eq!(fragment.clause, "name ILIKE $1 AND num_employees >= $2");
    assert_eq!(fragment.params, vec![json!("%c%"), json!(2)]);
}

#[test]
fn company_filter_rejects_unknown_key_before_normalization() {
    let raw = fields(&[("name", json!("x")), ("bogus", json!(1))]);
    assert!(!sql::validate_keys(&raw, columns::COMPANY_FILTER_FIELDS));
    assert!(sql::ensure_allowed_keys(&raw, columns::COMPANY_FILTER_FIELDS).is_err());
}

#[test]
fn company_filter_rejects_inconsistent_range() {
    let raw = fields(&[("minEmployees", json!("10")), ("maxEmployees", json!("5"))]);
    assert!(sql::verify_range(&raw, "minEmployees", "maxEmployees").is_err());
}

#[test]
fn job_filter_equity_flag_drives_the_sentinel_predicate() {
    let raw = fields(&[("title", json!("engineer")), ("hasEquity", json!("true"))]);

    assert!(sql::validate_keys(&raw, columns::JOB_FILTER_FIELDS));
    let normalized = sql::normalize_filter_values(raw, columns::JOB_FILTER_RULES);

    let fragment = sql::build_filter(&normalized, columns::JOB_FILTER_COLUMNS).unwrap();
    assert_eq!(fragment.clause, "title ILIKE $1 AND equity != $2");
    assert_eq!(fragment.params, vec![json!("%engineer%"), json!(0)]);
}

#[test]
fn job_filter_equity_false_means_no_filter() {
    let raw = fields(&[("hasEquity", json!("false"))]);
    let normalized = sql::normalize_filter_values(raw, columns::JOB_FILTER_RULES);
    assert!(normalized.is_empty());
}

#[test]
fn update_fragment_binds_trailing_key_parameter() {
    // A partial company update plus the WHERE-handle bind the models append.
    let body = fields(&[("numEmployees", json!(42)), ("logoUrl", json!("/logo.png"))]);

    assert!(sql::validate_keys(&body, columns::COMPANY_UPDATE_FIELDS));
    let fragment = sql::build_update(&body, columns::COMPANY_UPDATE_COLUMNS).unwrap();

    assert_eq!(fragment.clause, "\"num_employees\"=$1, \"logo_url\"=$2");
    assert_eq!(fragment.params, vec![json!(42), json!("/logo.png")]);
    assert_eq!(fragment.clause.matches('$').count(), fragment.params.len());
}
