use autoani_kernel::server::ApiError;
use autoani_kernel::validation::FieldError;
use std::borrow::Cow;

#[autoani_derive::autoani_error]
pub enum BrandError {
    #[error("Brand not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Another brand already uses the name.
    #[error("Brand conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid brand{}: {count} field error(s)", format_context(.context), count = .errors.len())]
    Validation { errors: Vec<FieldError>, context: Option<Cow<'static, str>> },

    #[error("Brand storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal brand error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<BrandError> for ApiError {
    fn from(err: BrandError) -> Self {
        match err {
            BrandError::NotFound { .. } => Self::not_found("Brand not found"),
            BrandError::Conflict { message, .. } => Self::conflict(message),
            BrandError::Validation { errors, .. } => Self::from(errors),
            other => Self::internal(other.to_string()),
        }
    }
}
