//! # Dashboard
//!
//! Statistics for the storefront and the admin dashboard, and the recorder that turns
//! catalog events into the activity log.

mod error;
mod handlers;
pub mod model;
mod recorder;
pub mod repository;

pub use crate::error::{DashboardError, DashboardErrorExt};
pub use crate::recorder::ActivityRecorder;
pub use crate::repository::StatsRepository;

use autoani_database::Database;
use autoani_domain::config::ApiConfig;
use autoani_events::EventBus;
use autoani_kernel::domain::registry::InitializedSlice;
use autoani_kernel::server::ApiState;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[autoani_derive::autoani_slice]
pub struct Dashboard {
    pub repo: StatsRepository,
    pub recorder: ActivityRecorder,
}

/// Must run inside a Tokio runtime; it starts the activity recorder.
///
/// # Errors
/// Returns [`DashboardError::Events`] when the recorder cannot subscribe to the bus.
pub fn init(config: &ApiConfig, db: &Database, events: &EventBus) -> Result<InitializedSlice, DashboardError> {
    let repo = StatsRepository::new(db.clone());
    let recorder = ActivityRecorder::spawn(repo.clone(), events, config.activity.retention)?;
    info!("Dashboard slice initialized");

    Ok(InitializedSlice::new(Dashboard::new(DashboardInner { repo, recorder })))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(handlers::homepage_stats)).routes(routes!(handlers::dashboard_stats))
}
