use std::sync::OnceLock;

use regex::Regex;

/// Extracts entity, field and value from PostgreSQL constraint violations.
///
/// Input is the primary message joined with the DETAIL line, since Postgres
/// reports the offending `Key (field)=(value)` only in the detail.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            // Key (username)=(STU202401000) already exists.
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").unwrap(),
            column_name: Regex::new(r#"column "([^"]+)""#).unwrap(),
            // "table" for foreign keys, "relation" for not-null and check
            relation_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).unwrap(),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

/// Suffixes Postgres appends to generated constraint and index names
const CONSTRAINT_SUFFIXES: [&str; 5] = ["_key", "_idx", "_check", "_pkey", "_fkey"];

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Parses a unique violation into `(entity, field, value)`.
    ///
    /// The field comes from the `Key (...)` detail when present so composite
    /// keys read as `"role, email"`; the constraint name is the fallback.
    ///
    /// ```
    /// use campus_records::error::ConstraintParser;
    ///
    /// let message = "duplicate key value violates unique constraint \"accounts_username_key\"\nKey (username)=(STU202401000) already exists.";
    /// let result = ConstraintParser::parse_unique_violation(message, Some("accounts_username_key"), None);
    /// assert_eq!(result, Some(("accounts".to_string(), "username".to_string(), "STU202401000".to_string())));
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
        table_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let from_constraint = constraint_name.and_then(Self::parse_constraint_name);
        let key_value = Self::extract_key_value_from_message(message);

        let entity = table_name
            .map(str::to_string)
            .or_else(|| from_constraint.as_ref().map(|(e, _)| e.clone()))
            .or_else(|| Self::extract_table_from_message(message));

        match (key_value, from_constraint) {
            (Some((field, value)), _) => {
                Some((entity.unwrap_or_else(|| "resource".to_string()), field, value))
            }
            (None, Some((constraint_entity, field))) => Some((
                entity.unwrap_or(constraint_entity),
                field,
                "duplicate_value".to_string(),
            )),
            (None, None) => None,
        }
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        table_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = table_name
            .map(str::to_string)
            .or_else(|| Self::extract_table_from_message(message))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a foreign key violation into `(entity, field, referenced_value)`.
    ///
    /// ```
    /// use campus_records::error::ConstraintParser;
    ///
    /// let message = "insert or update on table \"accounts\" violates foreign key constraint \"accounts_course_id_fkey\"\nKey (course_id)=(999) is not present in table \"courses\".";
    /// let result = ConstraintParser::parse_foreign_key_violation(message, Some("accounts_course_id_fkey"));
    /// assert_eq!(result, Some(("accounts".to_string(), "course_id".to_string(), "999".to_string())));
    /// ```
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = Self::extract_key_value_from_message(message)
                .map(|(_, v)| v)
                .unwrap_or_else(|| "invalid_reference".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = Self::extract_key_value_from_message(message)?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a check violation into `(entity, field)`.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }

        let field = Self::extract_column_from_message(message)?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits a generated constraint name into `(entity, field)`.
    ///
    /// - `"accounts_username_key"` -> `("accounts", "username")`
    /// - `"accounts_course_id_fkey"` -> `("accounts", "course_id")`
    /// - `"accounts_role_check"` -> `("accounts", "role")`
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .column_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// First quoted table or relation name in the message
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        Self::patterns()
            .relation_name
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        Self::patterns().key_value.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_name_strips_suffix() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("accounts_username_key"),
            Some(("accounts".to_string(), "username".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("subjects_course_id_fkey"),
            Some(("subjects".to_string(), "course_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("notices_notice_for_check"),
            Some(("notices".to_string(), "notice_for".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("accounts_pkey"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("no_suffix_here"), None);
    }

    #[test]
    fn test_unique_violation_prefers_detail_key() {
        let message = "duplicate key value violates unique constraint \"accounts_role_email_key\"\nKey (role, email)=(student, a@b.edu) already exists.";
        let parsed = ConstraintParser::parse_unique_violation(
            message,
            Some("accounts_role_email_key"),
            None,
        );
        assert_eq!(
            parsed,
            Some((
                "accounts".to_string(),
                "role, email".to_string(),
                "student, a@b.edu".to_string()
            ))
        );
    }

    #[test]
    fn test_unique_violation_without_detail_uses_constraint() {
        let message = "duplicate key value violates unique constraint \"courses_course_code_key\"";
        let parsed = ConstraintParser::parse_unique_violation(
            message,
            Some("courses_course_code_key"),
            None,
        );
        assert_eq!(
            parsed,
            Some((
                "courses".to_string(),
                "course_code".to_string(),
                "duplicate_value".to_string()
            ))
        );
    }

    #[test]
    fn test_unique_violation_table_hint_wins() {
        let message = "duplicate key value violates unique constraint \"x\"\nKey (name)=(BCA) already exists.";
        let parsed = ConstraintParser::parse_unique_violation(message, None, Some("courses"));
        assert_eq!(
            parsed,
            Some(("courses".to_string(), "name".to_string(), "BCA".to_string()))
        );
    }

    #[test]
    fn test_not_null_violation_reads_relation() {
        let message =
            "null value in column \"email\" of relation \"accounts\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::parse_not_null_violation(message, None),
            Some(("accounts".to_string(), "email".to_string()))
        );
    }

    #[test]
    fn test_check_violation_falls_back_to_message() {
        let message = "new row for relation \"accounts\" violates check constraint, column \"role\"";
        assert_eq!(
            ConstraintParser::parse_check_violation(message, None),
            Some(("accounts".to_string(), "role".to_string()))
        );
    }
}
