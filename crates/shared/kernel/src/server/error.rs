use super::response::ApiResponse;
use super::state::ApiStateError;
use crate::security::ResourceGuardError;
use crate::validation::FieldError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::borrow::Cow;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a request handler, rendered as an [`ApiResponse`] envelope.
///
/// Feature crates convert their own errors into this type; anything that is not a
/// client mistake ends up as [`ApiError::Internal`], which is logged and answered with
/// a bare `"Server Error"`.
#[autoani_derive::autoani_error]
pub enum ApiError {
    #[error("Validation failed{}: {count} field error(s)", format_context(.context), count = .errors.len())]
    Validation { errors: Vec<FieldError>, context: Option<Cow<'static, str>> },

    #[error("Bad request{}: {message}", format_context(.context))]
    BadRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unauthorized{}: {message}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Payload too large{}: {message}", format_context(.context))]
    PayloadTooLarge { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Too many requests{}: {message}", format_context(.context))]
    TooManyRequests { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest { message: message.into(), context: None }
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { message: message.into(), context: None }
    }

    pub fn too_many_requests(message: impl Into<Cow<'static, str>>) -> Self {
        Self::TooManyRequests { message: message.into(), context: None }
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Internal { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors, context: None }
    }
}

impl From<ResourceGuardError> for ApiError {
    fn from(err: ResourceGuardError) -> Self {
        match err {
            ResourceGuardError::Validation { message, context } => Self::BadRequest { message, context },
        }
    }
}

impl From<ApiStateError> for ApiError {
    fn from(err: ApiStateError) -> Self {
        Self::Internal { message: err.to_string().into(), context: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation { errors, .. } => ApiResponse::invalid(errors),
            Self::Internal { message, context } => {
                error!(context = context.as_deref().unwrap_or_default(), "{message}");
                ApiResponse::failure("Server Error")
            },
            Self::BadRequest { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::NotFound { message, .. }
            | Self::Conflict { message, .. }
            | Self::PayloadTooLarge { message, .. }
            | Self::TooManyRequests { message, .. } => ApiResponse::failure(message),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = render(ApiError::internal("connection reset by peer")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"success": false, "error": "Server Error"}));
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let err = ApiError::from(vec![FieldError::new("year", "Year must be at least 1900")]);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "year");
    }

    #[tokio::test]
    async fn not_found_keeps_message() {
        let (status, body) = render(ApiError::not_found("Vehicle not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Vehicle not found");
    }

    #[tokio::test]
    async fn throttled_requests_get_429() {
        let (status, body) = render(ApiError::too_many_requests("Slow down")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body, serde_json::json!({"success": false, "error": "Slow down"}));
    }
}
