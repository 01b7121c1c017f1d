use autoani_kernel::server::ApiError;
use std::borrow::Cow;

#[autoani_derive::autoani_error]
pub enum ContentError {
    #[error("Unsupported language{}: {message}", format_context(.context))]
    UnknownLanguage { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Broken translation file{}: {source}", format_context(.context))]
    Parse { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal content error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::UnknownLanguage { .. } => Self::not_found("Language not supported"),
            other => Self::internal(other.to_string()),
        }
    }
}
