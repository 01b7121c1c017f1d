use std::borrow::Cow;

#[autoani_derive::autoani_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

const MAX_KEY_LEN: usize = 64;

/// Validation of record identifiers received from clients.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Returns the bare record key of `id` for `expected_table`.
    ///
    /// Accepts both `abc` and `vehicle:abc`. An id naming another table is rejected,
    /// so a `brand:...` id can never address a vehicle.
    ///
    /// # Errors
    /// Returns [`ResourceGuardError::Validation`] on a table mismatch, an empty key,
    /// an overlong key or characters outside `[A-Za-z0-9_-]`.
    pub fn key<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id_ref = id.as_ref().trim();
        let table_ref = expected_table.as_ref();

        let key = match id_ref.split_once(':') {
            Some((table, _)) if table != table_ref => {
                return Err(ResourceGuardError::Validation {
                    message: format!("Expected '{table_ref}', got '{table}'").into(),
                    context: Some("ID table mismatch".into()),
                });
            },
            Some((_, key)) => key,
            None => id_ref,
        };

        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(ResourceGuardError::Validation {
                message: format!("Invalid {table_ref} id length").into(),
                context: None,
            });
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(ResourceGuardError::Validation {
                message: format!("Invalid characters in {table_ref} id").into(),
                context: None,
            });
        }

        Ok(key.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_matching_table_prefix() {
        assert_eq!(ResourceGuard::key("vehicle:Ab3_x-9", "vehicle").unwrap(), "Ab3_x-9");
        assert_eq!(ResourceGuard::key("Ab3", "vehicle").unwrap(), "Ab3");
    }

    #[test]
    fn rejects_foreign_tables_and_odd_keys() {
        assert!(ResourceGuard::key("brand:abc", "vehicle").is_err());
        assert!(ResourceGuard::key("vehicle:", "vehicle").is_err());
        assert!(ResourceGuard::key("abc def", "vehicle").is_err());
        assert!(ResourceGuard::key("a;DELETE", "vehicle").is_err());
        assert!(ResourceGuard::key("x".repeat(65), "vehicle").is_err());
    }
}
