use autoani::domain::config::{ApiConfig, CorsConfig};
use crate::rate_limit::{RateLimiter, limit_requests};
use autoani::kernel::server::ApiState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

/// Room for multipart boundaries and metadata fields on top of the file itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(info(
    title = "AutoAni API",
    description = "Inventory, brands, media and contact endpoints of the AutoAni dealership"
))]
struct ApiDoc;

pub fn init(state: ApiState) -> Router {
    let config: ApiConfig = state.config.clone();

    let (routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(autoani::router())
        .with_state(state)
        .split_for_parts();

    let mut router = Router::new()
        .merge(routes)
        .merge(Scalar::with_url("/api-docs", api_doc))
        .layer(DefaultBodyLimit::max(config.media.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD)))
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::if_not_present(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")))
        .layer(SetResponseHeaderLayer::if_not_present(X_FRAME_OPTIONS, HeaderValue::from_static("DENY")));

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        router = router.layer(middleware::from_fn_with_state(limiter, limit_requests));
    }

    router.layer(cors(&config.cors)).layer(TraceLayer::new_for_http())
}

fn cors(cfg: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring malformed CORS origin");
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
