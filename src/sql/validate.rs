use serde_json::Value;

use super::error::QueryError;
use super::types::FieldMap;

/// True iff every key in `fields` is a member of `allowed`.
///
/// Order-independent set membership. Fails closed: any key outside the
/// allowlist, including against an empty allowlist, returns false.
pub fn validate_keys(fields: &FieldMap, allowed: &[&str]) -> bool {
    fields.keys().all(|key| allowed.contains(&key.as_str()))
}

/// [`validate_keys`] as a fallible operation, naming the first offending key.
pub fn ensure_allowed_keys(fields: &FieldMap, allowed: &[&str]) -> Result<(), QueryError> {
    match fields.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(QueryError::UnknownField(key.clone())),
        None => Ok(()),
    }
}

/// Per-field normalization applied to filter values after key validation and
/// before fragment building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeRule {
    /// Substring-match text field: wrap the value as `%value%` for ILIKE.
    Contains,
    /// Numeric bound arriving as a query-string value: coerce numeric
    /// strings; non-numeric values are left untouched for the query layer
    /// to reject.
    Numeric,
    /// Tri-state boolean filter. A textual `"true"` (case and whitespace
    /// insensitive) becomes the sentinel `0` consumed by a `!= 0` predicate,
    /// a falsy value removes the key (no filter on that field), and anything
    /// else is left as-is.
    EquityFlag,
}

pub type NormalizeRules = &'static [(&'static str, NormalizeRule)];

fn rule_for(rules: NormalizeRules, field: &str) -> Option<NormalizeRule> {
    rules
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, rule)| *rule)
}

/// Apply the per-field rules to `fields`, producing the map the filter
/// builder consumes.
///
/// Never introduces a key that was not already present. Consumes its input:
/// normalization happens exactly once, immediately after key validation, and
/// the result is handed straight to [`super::build_filter`]. Re-normalizing
/// an already-normalized map is not supported (`Contains` wrapping is not
/// idempotent).
pub fn normalize_filter_values(fields: FieldMap, rules: NormalizeRules) -> FieldMap {
    let mut normalized = FieldMap::new();
    for (field, value) in fields {
        match rule_for(rules, &field) {
            Some(NormalizeRule::Contains) => {
                let wrapped = match &value {
                    Value::String(text) => Value::String(format!("%{}%", text)),
                    _ => value,
                };
                normalized.insert(field, wrapped);
            }
            Some(NormalizeRule::Numeric) => {
                let coerced = match &value {
                    Value::String(text) => coerce_number(text).unwrap_or(value),
                    _ => value,
                };
                normalized.insert(field, coerced);
            }
            Some(NormalizeRule::EquityFlag) => match &value {
                Value::String(text) => {
                    let flag = text.trim().to_ascii_lowercase();
                    if flag == "true" {
                        normalized.insert(field, Value::from(0));
                    } else if flag == "false" {
                        // No filter on this field.
                    } else {
                        normalized.insert(field, value);
                    }
                }
                Value::Bool(true) => {
                    normalized.insert(field, Value::from(0));
                }
                Value::Bool(false) => {}
                _ => {
                    normalized.insert(field, value);
                }
            },
            None => {
                normalized.insert(field, value);
            }
        }
    }
    normalized
}

fn coerce_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Value::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// Reject inconsistent numeric bounds: fails iff both `min_key` and
/// `max_key` are present with numeric values and min > max. Accepts raw
/// query-string values, so it can run before or after numeric coercion.
pub fn verify_range(fields: &FieldMap, min_key: &str, max_key: &str) -> Result<(), QueryError> {
    let min = fields.get(min_key).and_then(as_f64);
    let max = fields.get(max_key).and_then(as_f64);
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(QueryError::InvalidRange {
            min_field: min_key.to_string(),
            max_field: max_key.to_string(),
        }),
        _ => Ok(()),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FILTER_FIELDS: &[&str] = &["name", "minEmployees", "maxEmployees"];

    const RULES: NormalizeRules = &[
        ("name", NormalizeRule::Contains),
        ("minEmployees", NormalizeRule::Numeric),
        ("hasEquity", NormalizeRule::EquityFlag),
    ];

    fn fields(pairs: &[(&str, Value)]) -> FieldMap {
        let mut map = FieldMap::new();
        for (key, value) in pairs {
            map.insert(key.to_string(), value.clone());
        }
        map
    }

    #[test]
    fn validate_keys_accepts_subset_of_allowlist() {
        let data = fields(&[("name", json!("x"))]);
        assert!(validate_keys(&data, FILTER_FIELDS));
    }

    #[test]
    fn validate_keys_rejects_unknown_key() {
        let data = fields(&[("name", json!("x")), ("bogus", json!(1))]);
        assert!(!validate_keys(&data, FILTER_FIELDS));
    }

    #[test]
    fn validate_keys_fails_closed_on_empty_allowlist() {
        let data = fields(&[("name", json!("x"))]);
        assert!(!validate_keys(&data, &[]));
        assert!(validate_keys(&FieldMap::new(), &[]));
    }

    #[test]
    fn ensure_allowed_keys_names_the_offender() {
        let data = fields(&[("name", json!("x")), ("bogus", json!(1))]);
        assert_eq!(
            ensure_allowed_keys(&data, FILTER_FIELDS).unwrap_err(),
            QueryError::UnknownField("bogus".to_string())
        );
        assert!(ensure_allowed_keys(&fields(&[("name", json!("x"))]), FILTER_FIELDS).is_ok());
    }

    #[test]
    fn contains_wraps_text_for_substring_match() {
        let data = fields(&[("name", json!("wall"))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.get("name"), Some(&json!("%wall%")));
    }

    #[test]
    fn numeric_coerces_strings_and_leaves_garbage_alone() {
        let data = fields(&[("minEmployees", json!("2"))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.get("minEmployees"), Some(&json!(2)));

        let data = fields(&[("minEmployees", json!("two"))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.get("minEmployees"), Some(&json!("two")));
    }

    #[test]
    fn equity_flag_true_becomes_sentinel_zero() {
        let data = fields(&[("hasEquity", json!("true"))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.get("hasEquity"), Some(&json!(0)));

        // Case and whitespace insensitive.
        let data = fields(&[("hasEquity", json!("  TRUE "))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.get("hasEquity"), Some(&json!(0)));
    }

    #[test]
    fn equity_flag_false_removes_the_key() {
        let data = fields(&[("hasEquity", json!("false"))]);
        let normalized = normalize_filter_values(data, RULES);
        assert!(normalized.is_empty());
    }

    #[test]
    fn equity_flag_other_literals_pass_through() {
        let data = fields(&[("hasEquity", json!("maybe"))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.get("hasEquity"), Some(&json!("maybe")));

        // Already-normalized sentinel survives a second pass unchanged.
        let data = fields(&[("hasEquity", json!(0))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.get("hasEquity"), Some(&json!(0)));
    }

    #[test]
    fn normalization_never_introduces_keys() {
        let data = fields(&[("minEmployees", json!("3"))]);
        let normalized = normalize_filter_values(data, RULES);
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn range_rejects_min_above_max() {
        let data = fields(&[("minEmployees", json!(10)), ("maxEmployees", json!(5))]);
        assert_eq!(
            verify_range(&data, "minEmployees", "maxEmployees").unwrap_err(),
            QueryError::InvalidRange {
                min_field: "minEmployees".to_string(),
                max_field: "maxEmployees".to_string(),
            }
        );
    }

    #[test]
    fn range_is_a_noop_for_consistent_or_partial_bounds() {
        let data = fields(&[("minEmployees", json!(5)), ("maxEmployees", json!(10))]);
        assert!(verify_range(&data, "minEmployees", "maxEmployees").is_ok());

        let data = fields(&[("minEmployees", json!(5))]);
        assert!(verify_range(&data, "minEmployees", "maxEmployees").is_ok());

        assert!(verify_range(&FieldMap::new(), "minEmployees", "maxEmployees").is_ok());
    }

    #[test]
    fn range_compares_raw_query_string_values() {
        let data = fields(&[("minEmployees", json!("10")), ("maxEmployees", json!("5"))]);
        assert!(verify_range(&data, "minEmployees", "maxEmployees").is_err());
    }
}
