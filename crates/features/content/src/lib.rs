//! # Content
//!
//! Static storefront content: SEO metadata per page and the English and Albanian
//! translation dictionaries bundled into the binary.

mod error;
mod handlers;
pub mod i18n;
pub mod seo;

pub use crate::error::{ContentError, ContentErrorExt};

use crate::i18n::Catalog;
use autoani_kernel::domain::registry::InitializedSlice;
use autoani_kernel::server::ApiState;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[autoani_derive::autoani_slice]
pub struct Content {
    pub catalog: Catalog,
}

/// # Errors
/// Returns [`ContentError::Parse`] when a bundled dictionary is malformed.
pub fn init() -> Result<InitializedSlice, ContentError> {
    let catalog = Catalog::load()?;
    info!(languages = catalog.languages().len(), "Content slice initialized");

    Ok(InitializedSlice::new(Content::new(ContentInner { catalog })))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::seo_meta))
        .routes(routes!(handlers::list_languages))
        .routes(routes!(handlers::translations))
}
