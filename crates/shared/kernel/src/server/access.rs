use super::error::ApiError;
use crate::domain::config::ApiConfig;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

/// Guard for admin-only handlers.
///
/// With `security.admin_token` configured the request must carry
/// `Authorization: Bearer <token>`; without it admin routes stay open.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl<S> FromRequestParts<S> for AdminAccess
where
    ApiConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = ApiConfig::from_ref(state);
        let Some(expected) = config.security.admin_token.as_deref().filter(|t| !t.is_empty())
        else {
            return Ok(Self);
        };

        let provided = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);

        match provided {
            Some(token) if tokens_match(token.as_bytes(), expected.as_bytes()) => Ok(Self),
            _ => {
                warn!(path = %parts.uri.path(), "Rejected admin request");
                Err(ApiError::Unauthorized { message: "Admin access required".into(), context: None })
            },
        }
    }
}

fn tokens_match(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn check(token: Option<&str>, header: Option<&str>) -> bool {
        let mut config = ApiConfig::default();
        config.security.admin_token = token.map(str::to_owned);

        let mut builder = Request::builder().uri("/api/vehicles");
        if let Some(header) = header {
            builder = builder.header(AUTHORIZATION, header);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        AdminAccess::from_request_parts(&mut parts, &config).await.is_ok()
    }

    #[tokio::test]
    async fn open_without_token() {
        assert!(check(None, None).await);
        assert!(check(Some(""), None).await);
    }

    #[tokio::test]
    async fn requires_matching_bearer() {
        assert!(check(Some("s3cret"), Some("Bearer s3cret")).await);
        assert!(!check(Some("s3cret"), Some("Bearer nope")).await);
        assert!(!check(Some("s3cret"), Some("s3cret")).await);
        assert!(!check(Some("s3cret"), None).await);
    }
}
