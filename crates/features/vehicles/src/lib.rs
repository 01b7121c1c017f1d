//! # Vehicles
//!
//! The dealership inventory: filtered and paginated listings, featured and related
//! vehicles, lookups by id or slug (each counted as a view), favorites and the admin
//! create/update/delete operations.
//! Every admin mutation publishes a [`CatalogEvent`] on the bus.

pub mod demo;
mod error;
mod handlers;
pub mod model;
pub mod repository;

pub use crate::error::{VehicleError, VehicleErrorExt};
pub use crate::repository::VehicleRepository;

use crate::model::Vehicle;
use autoani_database::Database;
use autoani_domain::events::{ActivityKind, CatalogEvent};
use autoani_events::EventBus;
use autoani_kernel::domain::registry::InitializedSlice;
use autoani_kernel::server::ApiState;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[autoani_derive::autoani_slice]
pub struct Vehicles {
    pub repo: VehicleRepository,
    pub events: EventBus,
}

impl Vehicles {
    pub(crate) fn announce(&self, kind: ActivityKind, vehicle: &Vehicle, verb: &str) {
        let event = CatalogEvent::new(kind, &vehicle.id, format!("{verb}: {}", vehicle.title));
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, vehicle = %vehicle.id, "Failed to publish vehicle event");
        }
    }
}

#[must_use]
pub fn init(db: &Database, events: &EventBus) -> InitializedSlice {
    info!("Vehicles slice initialized");

    let inner = VehiclesInner { repo: VehicleRepository::new(db.clone()), events: events.clone() };

    InitializedSlice::new(Vehicles::new(inner))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_vehicles, handlers::create_vehicle))
        .routes(routes!(handlers::featured_vehicles))
        .routes(routes!(handlers::vehicle_by_slug))
        .routes(routes!(handlers::get_vehicle, handlers::update_vehicle, handlers::delete_vehicle))
        .routes(routes!(handlers::related_vehicles))
        .routes(routes!(handlers::favorite_vehicle, handlers::unfavorite_vehicle))
}
