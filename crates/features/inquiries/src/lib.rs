//! # Inquiries
//!
//! Storefront contact form submissions and newsletter sign-ups.

mod error;
mod handlers;
pub mod model;
pub mod repository;

pub use crate::error::{InquiryError, InquiryErrorExt};
pub use crate::repository::InquiryRepository;

use autoani_database::Database;
use autoani_kernel::domain::registry::InitializedSlice;
use autoani_kernel::server::ApiState;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[autoani_derive::autoani_slice]
pub struct Inquiries {
    pub repo: InquiryRepository,
}

#[must_use]
pub fn init(db: &Database) -> InitializedSlice {
    info!("Inquiries slice initialized");

    InitializedSlice::new(Inquiries::new(InquiriesInner { repo: InquiryRepository::new(db.clone()) }))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::submit_contact, handlers::list_inquiries))
        .routes(routes!(handlers::subscribe_newsletter))
}
