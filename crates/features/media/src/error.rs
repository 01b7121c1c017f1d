use autoani_kernel::server::ApiError;
use autoani_kernel::validation::FieldError;
use autoani_storage::StorageError;
use std::borrow::Cow;

#[autoani_derive::autoani_error]
pub enum MediaError {
    #[error("Media not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The upload itself is unacceptable (type, name or missing file).
    #[error("Upload rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Upload too large{}: {message}", format_context(.context))]
    TooLarge { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid media{}: {count} field error(s)", format_context(.context), count = .errors.len())]
    Validation { errors: Vec<FieldError>, context: Option<Cow<'static, str>> },

    #[error("Media file error{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Media storage error{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Internal media error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl MediaError {
    pub(crate) fn rejected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Rejected { message: message.into(), context: None }
    }
}

impl From<Vec<FieldError>> for MediaError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors, context: None }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NotFound { .. }
            | MediaError::Storage { source: StorageError::FileNotFound { .. }, .. } => {
                Self::not_found("Media not found")
            },
            MediaError::Rejected { message, .. } => Self::bad_request(message),
            MediaError::Storage {
                source:
                    StorageError::InvalidFolder { .. } | StorageError::PathTraversalAttempt { .. },
                ..
            } => Self::bad_request("Invalid folder or file name"),
            MediaError::TooLarge { message, .. } => Self::PayloadTooLarge { message, context: None },
            MediaError::Validation { errors, .. } => Self::from(errors),
            other => Self::internal(other.to_string()),
        }
    }
}
