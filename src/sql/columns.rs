//! Allowed-field lists, column maps, and normalization rules for every
//! entity and operation that builds dynamic SQL.
//!
//! The allowlists are what `validate_keys`/`ensure_allowed_keys` check
//! before any SQL text is assembled; the column maps are the only source of
//! column and predicate text. Request-controlled strings never appear in
//! either.

use super::types::ColumnMap;
use super::validate::{NormalizeRule, NormalizeRules};

// Companies

pub const COMPANY_FILTER_FIELDS: &[&str] = &["name", "minEmployees", "maxEmployees"];

pub const COMPANY_FILTER_COLUMNS: ColumnMap = &[
    ("name", "name ILIKE"),
    ("minEmployees", "num_employees >="),
    ("maxEmployees", "num_employees <="),
];

pub const COMPANY_FILTER_RULES: NormalizeRules = &[
    ("name", NormalizeRule::Contains),
    ("minEmployees", NormalizeRule::Numeric),
    ("maxEmployees", NormalizeRule::Numeric),
];

pub const COMPANY_UPDATE_FIELDS: &[&str] = &["name", "description", "numEmployees", "logoUrl"];

pub const COMPANY_UPDATE_COLUMNS: ColumnMap = &[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
];

// Jobs

pub const JOB_FILTER_FIELDS: &[&str] = &["title", "minSalary", "hasEquity"];

pub const JOB_FILTER_COLUMNS: ColumnMap = &[
    ("title", "title ILIKE"),
    ("minSalary", "salary >="),
    ("hasEquity", "equity !="),
];

pub const JOB_FILTER_RULES: NormalizeRules = &[
    ("title", NormalizeRule::Contains),
    ("minSalary", NormalizeRule::Numeric),
    ("hasEquity", NormalizeRule::EquityFlag),
];

pub const JOB_UPDATE_FIELDS: &[&str] = &["title", "salary", "equity"];

pub const JOB_UPDATE_COLUMNS: ColumnMap = &[
    ("title", "title"),
    ("salary", "salary"),
    ("equity", "equity"),
];

pub const JOB_INSERT_COLUMNS: ColumnMap = &[
    ("title", "title"),
    ("salary", "salary"),
    ("equity", "equity"),
    ("companyHandle", "company_handle"),
];

// Users

pub const USER_UPDATE_FIELDS: &[&str] = &["firstName", "lastName", "password", "email"];

pub const USER_UPDATE_COLUMNS: ColumnMap = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
];

// Applications

pub const APPLICATION_INSERT_COLUMNS: ColumnMap = &[
    ("username", "username"),
    ("jobId", "job_id"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::types::column_for;

    #[test]
    fn every_filter_field_has_a_predicate_and_a_rule() {
        for field in COMPANY_FILTER_FIELDS {
            assert!(column_for(COMPANY_FILTER_COLUMNS, field).is_some());
            assert!(COMPANY_FILTER_RULES.iter().any(|(name, _)| name == field));
        }
        for field in JOB_FILTER_FIELDS {
            assert!(column_for(JOB_FILTER_COLUMNS, field).is_some());
            assert!(JOB_FILTER_RULES.iter().any(|(name, _)| name == field));
        }
    }

    #[test]
    fn filter_predicates_carry_their_operator() {
        assert_eq!(column_for(COMPANY_FILTER_COLUMNS, "name"), Some("name ILIKE"));
        assert_eq!(
            column_for(COMPANY_FILTER_COLUMNS, "minEmployees"),
            Some("num_employees >=")
        );
        assert_eq!(column_for(JOB_FILTER_COLUMNS, "hasEquity"), Some("equity !="));
    }
}
