use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Converts Diesel errors into structured AppError variants.
///
/// Unique violations become `AppError::Duplicate`, which is what the
/// username allocation retry keys on.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = match info.details() {
            Some(details) => format!("{}\n{}", info.message(), details),
            None => info.message().to_string(),
        };
        let constraint_name = info.constraint_name();
        let table_name = info.table_name();

        let parsed = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(&message, constraint_name, table_name).map(
                    |(entity, field, value)| AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                )
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(&message, table_name).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(&message, constraint_name).map(
                    |(entity, field, referenced_value)| AppError::Validation {
                        field,
                        reason: format!(
                            "Invalid reference from {} with value '{}'",
                            entity, referenced_value
                        ),
                    },
                )
            }
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_check_violation(&message, constraint_name).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Check constraint failed for {} field", entity),
                    },
                )
            }
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, message)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDatabaseErrorInfo {
        message: String,
        details: Option<String>,
        table_name: Option<String>,
        constraint_name: Option<String>,
    }

    impl MockDatabaseErrorInfo {
        fn new(message: &str) -> Self {
            Self {
                message: message.to_string(),
                details: None,
                table_name: None,
                constraint_name: None,
            }
        }

        fn with_details(mut self, details: &str) -> Self {
            self.details = Some(details.to_string());
            self
        }

        fn with_table(mut self, table: &str) -> Self {
            self.table_name = Some(table.to_string());
            self
        }

        fn with_constraint(mut self, constraint: &str) -> Self {
            self.constraint_name = Some(constraint.to_string());
            self
        }
    }

    impl DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            self.details.as_deref()
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            self.table_name.as_deref()
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn convert(kind: DatabaseErrorKind, info: MockDatabaseErrorInfo) -> AppError {
        DatabaseErrorConverter::convert_diesel_error(
            DieselError::DatabaseError(kind, Box::new(info)),
            "insert account",
        )
    }

    #[test]
    fn test_convert_not_found_error() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find");
        assert!(matches!(result, AppError::NotFound { ref entity, .. } if entity == "resource"));
    }

    #[test]
    fn test_username_collision_is_duplicate_of_username() {
        let info = MockDatabaseErrorInfo::new(
            "duplicate key value violates unique constraint \"accounts_username_key\"",
        )
        .with_details("Key (username)=(STU202401000) already exists.")
        .with_table("accounts")
        .with_constraint("accounts_username_key");

        let result = convert(DatabaseErrorKind::UniqueViolation, info);
        assert!(result.is_duplicate_of("username"));
        match result {
            AppError::Duplicate { entity, value, .. } => {
                assert_eq!(entity, "accounts");
                assert_eq!(value, "STU202401000");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
    }

    #[test]
    fn test_email_collision_is_not_a_username_collision() {
        let info = MockDatabaseErrorInfo::new(
            "duplicate key value violates unique constraint \"accounts_role_email_key\"",
        )
        .with_details("Key (role, email)=(student, a@b.edu) already exists.")
        .with_constraint("accounts_role_email_key");

        let result = convert(DatabaseErrorKind::UniqueViolation, info);
        assert!(!result.is_duplicate_of("username"));
        assert!(result.is_duplicate_of("role, email"));
    }

    #[test]
    fn test_convert_not_null_violation() {
        let info = MockDatabaseErrorInfo::new(
            "null value in column \"email\" of relation \"accounts\" violates not-null constraint",
        );

        match convert(DatabaseErrorKind::NotNullViolation, info) {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "email");
                assert!(reason.contains("accounts"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_foreign_key_violation() {
        let info = MockDatabaseErrorInfo::new(
            "insert or update on table \"accounts\" violates foreign key constraint \"accounts_course_id_fkey\"",
        )
        .with_details("Key (course_id)=(999) is not present in table \"courses\".")
        .with_constraint("accounts_course_id_fkey");

        match convert(DatabaseErrorKind::ForeignKeyViolation, info) {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "course_id");
                assert!(reason.contains("999"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_check_violation() {
        let info = MockDatabaseErrorInfo::new(
            "new row for relation \"accounts\" violates check constraint \"accounts_role_check\"",
        )
        .with_constraint("accounts_role_check");

        match convert(DatabaseErrorKind::CheckViolation, info) {
            AppError::Validation { field, .. } => assert_eq!(field, "role"),
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_violation_falls_back_to_database_error() {
        let info = MockDatabaseErrorInfo::new("something odd");
        assert!(matches!(
            convert(DatabaseErrorKind::UniqueViolation, info),
            AppError::Database { .. }
        ));
    }
}
