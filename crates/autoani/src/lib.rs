//! Facade crate for the `AutoAni` feature slices and shared modules.
//! Re-exports domain/kernel primitives and aggregates slice initialization and routing.
//! Keep this crate thin: it composes other crates, it does not implement business logic.

mod error;

pub use crate::error::{BootstrapError, BootstrapErrorExt};
pub use autoani_domain as domain;
pub use autoani_kernel as kernel;

use autoani_database::Database;
use autoani_domain::config::ApiConfig;
use autoani_domain::registry::InitializedSlice;
use autoani_events::EventBus;
use autoani_kernel::server::{ApiState, system_router};
use tracing::{debug, info};
use utoipa_axum::router::OpenApiRouter;

pub mod features {
    pub use autoani_brands as brands;
    pub use autoani_content as content;
    pub use autoani_dashboard as dashboard;
    pub use autoani_identity as identity;
    pub use autoani_inquiries as inquiries;
    pub use autoani_media as media;
    pub use autoani_vehicles as vehicles;

    /// Slices compiled into this build, in registration order.
    pub const ENABLED: &[&str] =
        &["vehicles", "brands", "media", "inquiries", "content", "dashboard", "identity"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initializes every feature slice. Must run inside a Tokio runtime.
///
/// With `demo.enabled` an empty catalog is seeded first.
///
/// # Errors
/// Returns the first slice that fails to start.
pub async fn init(
    config: &ApiConfig,
    database: &Database,
    events: &EventBus,
) -> Result<Vec<InitializedSlice>, BootstrapError> {
    if config.demo.enabled {
        seed_demo(database).await?;
    }

    let slices = vec![
        features::vehicles::init(database, events),
        features::brands::init(database, events),
        features::media::init(config, database, events).await?,
        features::inquiries::init(database),
        features::content::init()?,
        features::dashboard::init(config, database, events)?,
    ];
    for slice in &slices {
        debug!(slice = slice.name, "Slice ready");
    }
    info!(slices = slices.len(), "Feature slices initialized");

    Ok(slices)
}

/// Seeds the sample vehicles and brands into empty tables. Returns how many of each were added.
///
/// # Errors
/// Returns [`BootstrapError::Vehicles`] or [`BootstrapError::Brands`] when a write fails.
pub async fn seed_demo(database: &Database) -> Result<(usize, usize), BootstrapError> {
    let vehicles =
        features::vehicles::demo::seed(&features::vehicles::VehicleRepository::new(database.clone())).await?;
    let brands = features::brands::demo::seed(&features::brands::BrandRepository::new(database.clone())).await?;
    info!(vehicles, brands, "Demo catalog seeded");

    Ok((vehicles, brands))
}

/// Stops the background work started by [`init`], letting it finish what is queued.
pub async fn shutdown(state: &ApiState) {
    if let Ok(dashboard) = state.try_get_slice::<features::dashboard::Dashboard>() {
        dashboard.recorder.shutdown().await;
    }
    info!("Background tasks stopped");
}

/// Every public route: system probes plus all feature slices.
pub fn router() -> OpenApiRouter<ApiState> {
    system_router()
        .merge(features::vehicles::router())
        .merge(features::brands::router())
        .merge(features::media::router())
        .merge(features::inquiries::router())
        .merge(features::content::router())
        .merge(features::dashboard::router())
        .merge(features::identity::router())
}
