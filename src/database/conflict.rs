//! Storage conflict translation
//!
//! Postgres reports every uniqueness violation with the same SQLSTATE, so the
//! violated constraint (or, failing that, the column named in the error
//! detail) decides which business rule was broken.
//!
//! | Condition | SQLSTATE | Result |
//! |-----------|----------|--------|
//! | Unique violation on a known constraint | `23505` | `RegistryError::Conflict` |
//! | Unique violation on anything else | `23505` | `RegistryError::Internal` |
//! | Any other failure | any | `RegistryError::Internal` |

use sqlx::postgres::PgDatabaseError;

use crate::utils::errors::RegistryError;
use crate::utils::logging;

pub const UNIQUE_VIOLATION: &str = "23505";

/// A uniqueness constraint with business meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub table: &'static str,
    pub constraint: &'static str,
    pub column: &'static str,
    pub reason: &'static str,
}

pub const UNIQUE_CONSTRAINTS: &[UniqueConstraint] = &[
    UniqueConstraint {
        table: "enrollees",
        constraint: "enrollees_roll_code_key",
        column: "roll_code",
        reason: "roll code must be unique",
    },
    UniqueConstraint {
        table: "enrollees",
        constraint: "enrollees_email_key",
        column: "email",
        reason: "email must be unique",
    },
    UniqueConstraint {
        table: "departments",
        constraint: "departments_course_name_key",
        column: "course_name",
        reason: "course name must be unique",
    },
];

/// Find the business constraint behind a unique violation.
///
/// `detail` is the server's detail line, e.g. `Key (email)=(a@b.io) already exists.`
pub fn classify(
    table: Option<&str>,
    constraint: Option<&str>,
    detail: Option<&str>,
) -> Option<&'static UniqueConstraint> {
    if let Some(name) = constraint {
        if let Some(known) = UNIQUE_CONSTRAINTS.iter().find(|c| c.constraint == name) {
            return Some(known);
        }
    }

    let detail = detail?;
    UNIQUE_CONSTRAINTS.iter().find(|c| {
        table.map_or(true, |t| t == c.table) && detail.contains(&format!("({})", c.column))
    })
}

/// Map a failed write to a domain error
pub fn translate(err: sqlx::Error) -> RegistryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let (table, detail) = match db_err.try_downcast_ref::<PgDatabaseError>() {
                Some(pg) => (pg.table(), pg.detail()),
                None => (None, None),
            };

            if let Some(known) = classify(table, db_err.constraint(), detail) {
                logging::log_conflict(known.table, known.column);
                return RegistryError::Conflict {
                    field: known.column,
                    reason: known.reason,
                };
            }
        }
    }

    RegistryError::Internal(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_classify_by_constraint_name() {
        let found = classify(None, Some("enrollees_roll_code_key"), None).unwrap();
        assert_eq!(found.column, "roll_code");
        assert_eq!(found.reason, "roll code must be unique");

        let found = classify(None, Some("departments_course_name_key"), None).unwrap();
        assert_eq!(found.column, "course_name");
    }

    #[test]
    fn test_classify_falls_back_to_detail_column() {
        let found = classify(
            Some("enrollees"),
            Some("some_renamed_index"),
            Some("Key (email)=(asha@example.com) already exists."),
        )
        .unwrap();
        assert_eq!(found.reason, "email must be unique");
    }

    #[test]
    fn test_classify_detail_respects_table() {
        // an email uniqueness rule on another table is not an enrollee conflict
        let found = classify(
            Some("contacts"),
            None,
            Some("Key (email)=(asha@example.com) already exists."),
        );
        assert!(found.is_none());
    }

    #[test]
    fn test_unknown_violation_is_not_classified() {
        assert!(classify(None, Some("organizations_pkey"), Some("Key (id)=(1) already exists.")).is_none());
        assert!(classify(None, None, None).is_none());
    }

    #[test]
    fn test_non_database_errors_stay_internal() {
        assert_matches!(translate(sqlx::Error::RowNotFound), RegistryError::Internal(sqlx::Error::RowNotFound));
        assert_matches!(translate(sqlx::Error::PoolTimedOut), RegistryError::Internal(_));
    }
}
