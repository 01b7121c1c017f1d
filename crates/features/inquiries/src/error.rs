use autoani_kernel::server::ApiError;
use autoani_kernel::validation::FieldError;
use std::borrow::Cow;

#[autoani_derive::autoani_error]
pub enum InquiryError {
    #[error("Invalid submission{}: {count} field error(s)", format_context(.context), count = .errors.len())]
    Validation { errors: Vec<FieldError>, context: Option<Cow<'static, str>> },

    #[error("Inquiry storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal inquiry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<Vec<FieldError>> for InquiryError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors, context: None }
    }
}

impl From<InquiryError> for ApiError {
    fn from(err: InquiryError) -> Self {
        match err {
            InquiryError::Validation { errors, .. } => Self::from(errors),
            other => Self::internal(other.to_string()),
        }
    }
}
