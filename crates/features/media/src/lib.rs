//! # Media
//!
//! The media library. Files live in the upload [`Storage`] under
//! `<folder>/<id>.<ext>`; their metadata lives in the `media` table. Only files that
//! have a record are served back under the public uploads prefix.

mod error;
mod handlers;
pub mod model;
pub mod repository;
mod service;

pub use crate::error::{MediaError, MediaErrorExt};
pub use crate::repository::MediaRepository;

use crate::model::MediaFile;
use autoani_database::Database;
use autoani_domain::config::{ApiConfig, MediaConfig};
use autoani_domain::constants::MEDIA_FOLDERS;
use autoani_domain::events::{ActivityKind, CatalogEvent};
use autoani_events::EventBus;
use autoani_kernel::domain::registry::InitializedSlice;
use autoani_kernel::server::ApiState;
use autoani_storage::Storage;
use tracing::{info, warn};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[autoani_derive::autoani_slice]
pub struct Media {
    pub repo: MediaRepository,
    pub storage: Storage,
    pub limits: MediaConfig,
    /// URL prefix files are served under, without a trailing slash.
    pub public_url: String,
    pub events: EventBus,
}

impl Media {
    pub(crate) fn announce(&self, kind: ActivityKind, file: &MediaFile, verb: &str) {
        let event = CatalogEvent::new(kind, &file.id, format!("{verb}: {}", file.original_name));
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, media = %file.id, "Failed to publish media event");
        }
    }
}

/// Opens the upload storage and creates the well-known folders.
///
/// # Errors
/// Returns [`MediaError::Storage`] when the uploads directory cannot be prepared.
pub async fn init(config: &ApiConfig, db: &Database, events: &EventBus) -> Result<InitializedSlice, MediaError> {
    let storage = Storage::builder()
        .root(&config.storage.uploads_dir)
        .connect()
        .await
        .context("Opening upload storage")?;

    for name in MEDIA_FOLDERS {
        storage.folder(name)?.ensure().await?;
    }

    info!(folders = MEDIA_FOLDERS.len(), "Media slice initialized");

    let inner = MediaInner {
        repo: MediaRepository::new(db.clone()),
        storage,
        limits: config.media.clone(),
        public_url: config.storage.public_url.trim_end_matches('/').to_owned(),
        events: events.clone(),
    };

    Ok(InitializedSlice::new(Media::new(inner)))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_media, handlers::upload_media))
        .routes(routes!(handlers::media_folders))
        .routes(routes!(handlers::get_media, handlers::update_media, handlers::delete_media))
        .routes(routes!(handlers::serve_upload))
}
