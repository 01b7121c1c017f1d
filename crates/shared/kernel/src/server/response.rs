use crate::validation::FieldError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// The JSON envelope wrapped around every API reply.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub const fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None, error: None, errors: None }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { success: true, data: None, message: Some(message.into()), error: None, errors: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, data: None, message: None, error: Some(error.into()), errors: None }
    }

    #[must_use]
    pub const fn invalid(errors: Vec<FieldError>) -> Self {
        Self { success: false, data: None, message: None, error: None, errors: Some(errors) }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// `201 Created` carrying `data`.
    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self::ok(data)))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(value, json!({"success": true, "data": [1, 2]}));

        let value = serde_json::to_value(ApiResponse::failure("Server Error")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Server Error"}));

        let value =
            serde_json::to_value(ApiResponse::invalid(vec![FieldError::new("year", "bad")])).unwrap();
        assert_eq!(value, json!({"success": false, "errors": [{"field": "year", "message": "bad"}]}));
    }

    #[test]
    fn created_wraps_data_with_201() {
        let (status, Json(body)) = ApiResponse::created("bmw-x5");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(serde_json::to_value(body).unwrap(), json!({"success": true, "data": "bmw-x5"}));
    }
}
