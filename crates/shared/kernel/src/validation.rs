//! Field-level input validation that reports every problem at once.
//!
//! The rules themselves come from the `validator` crate; [`Validator`] only
//! gathers their verdicts into [`FieldError`]s for the `errors[]` envelope.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use validator::{ValidateEmail, ValidateLength};

pub use validator::ValidateRange;

/// One rejected input field. `field` uses the camelCase wire name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Collects [`FieldError`]s while a payload is normalised.
///
/// ```rust
/// use autoani_kernel::validation::Validator;
///
/// let mut v = Validator::new();
/// let title = v.required("title", "Title", "  BMW X5  ", 200);
/// v.range("year", "Year", 1850, Some(1900), Some(2027));
///
/// assert_eq!(title, "BMW X5");
/// let errors = v.finish().unwrap_err();
/// assert_eq!(errors[0].field, "year");
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Trims `value` and checks it is present and at most `max` characters long.
    pub fn required(&mut self, field: &str, label: &str, value: &str, max: usize) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, format!("{label} is required"));
        } else {
            self.max_len(field, label, value, max);
        }
        value.to_owned()
    }

    /// Like [`Validator::required`] but blank input yields `None` without an error.
    pub fn optional(
        &mut self,
        field: &str,
        label: &str,
        value: Option<&str>,
        max: usize,
    ) -> Option<String> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        self.max_len(field, label, value, max);
        Some(value.to_owned())
    }

    /// Checks `min <= value <= max` for whichever bounds are given.
    pub fn range<T>(&mut self, field: &str, label: &str, value: T, min: Option<T>, max: Option<T>)
    where
        T: ValidateRange<T> + Display + Copy,
    {
        if let Some(min) = min.filter(|min| !value.validate_range(Some(*min), None, None, None)) {
            self.push(field, format!("{label} must be at least {min}"));
        } else if let Some(max) = max.filter(|max| !value.validate_range(None, Some(*max), None, None)) {
            self.push(field, format!("{label} cannot exceed {max}"));
        }
    }

    /// Parses `value` into one of the `allowed` variants.
    pub fn choice<E>(&mut self, field: &str, label: &str, value: &str, allowed: &[&str]) -> Option<E>
    where
        E: FromStr,
    {
        let parsed = value.trim().parse::<E>().ok();
        if parsed.is_none() {
            self.push(field, format!("{label} must be one of: {}", allowed.join(", ")));
        }
        parsed
    }

    /// Trims every item, drops blank ones and checks the length of the rest.
    pub fn list(&mut self, field: &str, label: &str, items: &[String], max: usize) -> Vec<String> {
        items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .enumerate()
            .map(|(idx, item)| {
                self.max_len(&format!("{field}[{idx}]"), label, item, max);
                item.to_owned()
            })
            .collect()
    }

    /// Trims and lowercases an email address, recording an error when it does not look like one.
    pub fn email(&mut self, field: &str, value: &str) -> String {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            self.push(field, "Email is required");
        } else if !value.validate_email() {
            self.push(field, "Please enter a valid email");
        }
        value
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// # Errors
    /// Returns every collected [`FieldError`] when at least one was recorded.
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() { Ok(()) } else { Err(self.errors) }
    }

    fn max_len(&mut self, field: &str, label: &str, value: &str, max: usize) {
        if !value.validate_length(None, Some(u64::try_from(max).unwrap_or(u64::MAX)), None) {
            self.push(field, format!("{label} cannot exceed {max} characters"));
        }
    }
}
