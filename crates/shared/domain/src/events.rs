//! Events published on the bus when the catalog changes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    VehicleAdded,
    VehicleUpdated,
    VehicleDeleted,
    BrandAdded,
    BrandUpdated,
    BrandDeleted,
    MediaUploaded,
    MediaDeleted,
}

impl ActivityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VehicleAdded => "vehicle_added",
            Self::VehicleUpdated => "vehicle_updated",
            Self::VehicleDeleted => "vehicle_deleted",
            Self::BrandAdded => "brand_added",
            Self::BrandUpdated => "brand_updated",
            Self::BrandDeleted => "brand_deleted",
            Self::MediaUploaded => "media_uploaded",
            Self::MediaDeleted => "media_deleted",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change to vehicles, brands or media, with a human-readable summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEvent {
    pub kind: ActivityKind,
    pub subject_id: String,
    pub description: String,
}

impl CatalogEvent {
    pub fn new(kind: ActivityKind, subject_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self { kind, subject_id: subject_id.into(), description: description.into() }
    }
}
