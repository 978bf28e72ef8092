//! Classification of errors reported by the backing store.
//!
//! Callers pass the structured error code when the driver exposes one
//! (a PostgreSQL SQLSTATE or a PostgREST `PGRST*` code) together with the
//! message. Codes always win; message inspection is the fallback for errors
//! that arrive without a usable code. Nothing else in the workspace should
//! inspect error strings.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// What a store error means to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreErrorKind {
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write or delete.
    ForeignKeyViolation { constraint: Option<String> },
    /// A check or not-null constraint rejected the write.
    CheckViolation { constraint: Option<String> },
    /// A single-row fetch found nothing.
    NoRows,
    /// A relation the query referenced does not exist.
    MissingTable { table: Option<String> },
    /// A column the query referenced does not exist.
    MissingColumn { column: Option<String> },
    /// Timeout, connection loss, or contention. Retrying may succeed.
    Transient,
    Other,
}

impl StoreErrorKind {
    pub fn is_schema_drift(&self) -> bool {
        matches!(
            self,
            StoreErrorKind::MissingTable { .. } | StoreErrorKind::MissingColumn { .. }
        )
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, StoreErrorKind::Transient)
    }
}

static RELATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"relation "(?:[A-Za-z_][A-Za-z0-9_]*\.)?([A-Za-z_][A-Za-z0-9_]*)" does not exist"#)
        .expect("valid regex")
});

static SCHEMA_CACHE_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"find the table '(?:[A-Za-z_][A-Za-z0-9_]*\.)?([A-Za-z_][A-Za-z0-9_]*)'")
        .expect("valid regex")
});

static COLUMN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"column "?'?(?:[A-Za-z_][A-Za-z0-9_]*\.)?([A-Za-z_][A-Za-z0-9_]*)"?'? (?:of relation "[^"]+" )?does not exist|find the '([A-Za-z_][A-Za-z0-9_]*)' column"#)
        .expect("valid regex")
});

/// Classify a store error from its code (if any), constraint name (if any)
/// and message.
pub fn classify(code: Option<&str>, constraint: Option<&str>, message: &str) -> StoreErrorKind {
    let constraint = constraint.map(str::to_string);

    if let Some(code) = code {
        match code {
            "23505" => return StoreErrorKind::UniqueViolation { constraint },
            "23503" => return StoreErrorKind::ForeignKeyViolation { constraint },
            "23502" | "23514" => return StoreErrorKind::CheckViolation { constraint },
            "42P01" | "PGRST205" => {
                return StoreErrorKind::MissingTable {
                    table: table_from_message(message),
                }
            }
            "42703" | "PGRST204" => {
                return StoreErrorKind::MissingColumn {
                    column: column_from_message(message),
                }
            }
            "PGRST116" => return StoreErrorKind::NoRows,
            "40001" | "40P01" | "53300" | "57014" => return StoreErrorKind::Transient,
            c if c.starts_with("08") || c.starts_with("57P") => return StoreErrorKind::Transient,
            _ => {}
        }
    }

    classify_message(message, constraint)
}

/// Last-resort classification when no structured code is available.
fn classify_message(message: &str, constraint: Option<String>) -> StoreErrorKind {
    let lower = message.to_lowercase();

    if lower.contains("duplicate key") {
        return StoreErrorKind::UniqueViolation { constraint };
    }
    if lower.contains("violates foreign key") {
        return StoreErrorKind::ForeignKeyViolation { constraint };
    }
    if lower.contains("column") && (lower.contains("does not exist") || lower.contains("schema cache")) {
        return StoreErrorKind::MissingColumn {
            column: column_from_message(message),
        };
    }
    if lower.contains("does not exist") || lower.contains("schema cache") {
        return StoreErrorKind::MissingTable {
            table: table_from_message(message),
        };
    }
    if lower.contains("timed out")
        || lower.contains("timeout")
        || lower.contains("connection")
        || lower.contains("pool")
    {
        return StoreErrorKind::Transient;
    }

    StoreErrorKind::Other
}

fn table_from_message(message: &str) -> Option<String> {
    RELATION_RE
        .captures(message)
        .or_else(|| SCHEMA_CACHE_TABLE_RE.captures(message))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn column_from_message(message: &str) -> Option<String> {
    COLUMN_RE
        .captures(message)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_by_code() {
        assert_eq!(
            classify(
                Some("23505"),
                Some("uq_votes_user_nominee"),
                "duplicate key value violates unique constraint"
            ),
            StoreErrorKind::UniqueViolation {
                constraint: Some("uq_votes_user_nominee".into())
            }
        );
    }

    #[test]
    fn foreign_key_violation_by_code() {
        let kind = classify(Some("23503"), Some("fk_academy_members_genre"), "");
        assert!(matches!(kind, StoreErrorKind::ForeignKeyViolation { .. }));
    }

    #[test]
    fn missing_table_by_sqlstate_extracts_name() {
        assert_eq!(
            classify(Some("42P01"), None, r#"relation "public.events" does not exist"#),
            StoreErrorKind::MissingTable {
                table: Some("events".into())
            }
        );
    }

    #[test]
    fn missing_table_by_postgrest_code() {
        assert_eq!(
            classify(
                Some("PGRST205"),
                None,
                "Could not find the table 'public.content' in the schema cache"
            ),
            StoreErrorKind::MissingTable {
                table: Some("content".into())
            }
        );
    }

    #[test]
    fn missing_column_by_sqlstate_extracts_name() {
        assert_eq!(
            classify(
                Some("42703"),
                None,
                r#"column "is_featured" of relation "events" does not exist"#
            ),
            StoreErrorKind::MissingColumn {
                column: Some("is_featured".into())
            }
        );
    }

    #[test]
    fn missing_column_by_postgrest_message() {
        assert_eq!(
            classify(
                None,
                None,
                "Could not find the 'capacity' column of 'events' in the schema cache"
            ),
            StoreErrorKind::MissingColumn {
                column: Some("capacity".into())
            }
        );
    }

    #[test]
    fn code_wins_over_message() {
        // Message mentions a missing relation but the code says unique violation.
        let kind = classify(Some("23505"), None, r#"relation "x" does not exist"#);
        assert!(matches!(kind, StoreErrorKind::UniqueViolation { .. }));
    }

    #[test]
    fn message_fallback_detects_missing_table() {
        let kind = classify(None, None, r#"relation "votes" does not exist"#);
        assert_eq!(
            kind,
            StoreErrorKind::MissingTable {
                table: Some("votes".into())
            }
        );
        assert!(kind.is_schema_drift());
    }

    #[test]
    fn transient_codes_and_messages() {
        assert!(classify(Some("08006"), None, "").is_transient());
        assert!(classify(Some("57P01"), None, "").is_transient());
        assert!(classify(Some("40001"), None, "").is_transient());
        assert!(classify(None, None, "pool timed out while waiting for an open connection").is_transient());
    }

    #[test]
    fn no_rows_code() {
        assert_eq!(
            classify(Some("PGRST116"), None, "JSON object requested, multiple (or no) rows returned"),
            StoreErrorKind::NoRows
        );
    }

    #[test]
    fn unknown_errors_are_other() {
        assert_eq!(classify(Some("22P02"), None, "invalid input syntax"), StoreErrorKind::Other);
        assert_eq!(classify(None, None, "something odd"), StoreErrorKind::Other);
    }
}
