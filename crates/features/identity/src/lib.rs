//! # Identity
//!
//! Reserved authentication routes. Both answer with a fixed message until accounts
//! exist; admin mutations are guarded by the bearer token in
//! [`AdminAccess`](autoani_kernel::server::AdminAccess) instead.

use autoani_derive::api_handler;
use autoani_domain::constants::TAG_AUTH;
use autoani_kernel::prelude::*;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_handler(
    post,
    path = "/api/auth/login",
    responses((status = OK, description = "Login endpoint")),
    tag = TAG_AUTH,
)]
pub(crate) async fn login() -> ApiResponse<()> {
    ApiResponse::message("Login endpoint")
}

#[api_handler(
    post,
    path = "/api/auth/register",
    responses((status = OK, description = "Register endpoint")),
    tag = TAG_AUTH,
)]
pub(crate) async fn register() -> ApiResponse<()> {
    ApiResponse::message("Register endpoint")
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(login)).routes(routes!(register))
}
