//! # Brands
//!
//! Manufacturer catalog. A brand's `vehicleCount` is never stored; it is counted from
//! the vehicle table whenever a brand is read.

pub mod demo;
mod error;
mod handlers;
pub mod model;
pub mod repository;

pub use crate::error::{BrandError, BrandErrorExt};
pub use crate::repository::BrandRepository;

use crate::model::Brand;
use autoani_database::Database;
use autoani_domain::events::{ActivityKind, CatalogEvent};
use autoani_events::EventBus;
use autoani_kernel::domain::registry::InitializedSlice;
use autoani_kernel::server::ApiState;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[autoani_derive::autoani_slice]
pub struct Brands {
    pub repo: BrandRepository,
    pub events: EventBus,
}

impl Brands {
    pub(crate) fn announce(&self, kind: ActivityKind, brand: &Brand, verb: &str) {
        let event = CatalogEvent::new(kind, &brand.id, format!("{verb}: {}", brand.name));
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, brand = %brand.id, "Failed to publish brand event");
        }
    }
}

#[must_use]
pub fn init(db: &Database, events: &EventBus) -> InitializedSlice {
    info!("Brands slice initialized");

    let inner = BrandsInner { repo: BrandRepository::new(db.clone()), events: events.clone() };

    InitializedSlice::new(Brands::new(inner))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_brands, handlers::create_brand))
        .routes(routes!(handlers::featured_brands))
        .routes(routes!(handlers::brand_by_slug))
        .routes(routes!(handlers::get_brand, handlers::update_brand, handlers::delete_brand))
}
