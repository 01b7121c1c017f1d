use autoani_kernel::server::ApiError;
use autoani_kernel::validation::FieldError;
use std::borrow::Cow;

#[autoani_derive::autoani_error]
pub enum VehicleError {
    #[error("Vehicle not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid vehicle{}: {count} field error(s)", format_context(.context), count = .errors.len())]
    Validation { errors: Vec<FieldError>, context: Option<Cow<'static, str>> },

    #[error("Vehicle storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal vehicle error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VehicleError {
    pub(crate) fn not_found(key: &str) -> Self {
        Self::NotFound { message: key.to_owned().into(), context: None }
    }
}

impl From<Vec<FieldError>> for VehicleError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors, context: None }
    }
}

impl From<VehicleError> for ApiError {
    fn from(err: VehicleError) -> Self {
        match err {
            VehicleError::NotFound { .. } => Self::not_found("Vehicle not found"),
            VehicleError::Validation { errors, .. } => Self::from(errors),
            other => Self::internal(other.to_string()),
        }
    }
}
