use regex::Regex;
use std::sync::LazyLock;

/// Extracts structured information from PostgreSQL unique violation messages.
pub struct ConstraintParser;

/// Matches the "Key (field)=(value)" detail line PostgreSQL attaches.
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern compiles")
});

/// Matches a relation name in quotes.
static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:table|relation) "([^"]+)""#).expect("table pattern compiles")
});

const CONSTRAINT_SUFFIXES: &[&str] = &["_pkey", "_key", "_idx", "_unique"];

impl ConstraintParser {
    /// Returns `(entity, field, value)` for a unique violation.
    ///
    /// The constraint name (`<table>_<column>_key`) is preferred; the detail
    /// line of the message is the fallback.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let detail = Self::extract_key_value_from_message(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = detail
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = detail?;
        let entity = TABLE_NAME
            .captures(message)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Splits `profiles_external_auth_id_key` into `("profiles", "external_auth_id")`.
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))?;
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let caps = KEY_VALUE.captures(message)?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_name() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("profiles_external_auth_id_key"),
            Some(("profiles".to_string(), "external_auth_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("profiles_email_key"),
            Some(("profiles".to_string(), "email".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("noseparator_key"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("profiles_email"), None);
    }

    #[test]
    fn test_parse_unique_violation_from_message_only() {
        let message = "duplicate key value violates unique constraint on relation \"profiles\"\nDETAIL: Key (email)=(a@example.com) already exists.";
        assert_eq!(
            ConstraintParser::parse_unique_violation(message, None),
            Some((
                "profiles".to_string(),
                "email".to_string(),
                "a@example.com".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_detail() {
        assert_eq!(
            ConstraintParser::parse_unique_violation("duplicate", Some("profiles_email_key")),
            Some((
                "profiles".to_string(),
                "email".to_string(),
                "duplicate_value".to_string()
            ))
        );
        assert_eq!(ConstraintParser::parse_unique_violation("duplicate", None), None);
    }
}
