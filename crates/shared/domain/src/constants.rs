//! Table names and `OpenAPI` tags.

pub const VEHICLE: &str = "vehicle";
pub const BRAND: &str = "brand";
pub const MEDIA: &str = "media";
pub const INQUIRY: &str = "inquiry";
pub const SUBSCRIBER: &str = "subscriber";
pub const ACTIVITY: &str = "activity";

pub const TAG_SYSTEM: &str = "System";
pub const TAG_VEHICLES: &str = "Vehicles";
pub const TAG_BRANDS: &str = "Brands";
pub const TAG_MEDIA: &str = "Media";
pub const TAG_CONTACT: &str = "Contact";
pub const TAG_CONTENT: &str = "Content";
pub const TAG_STATS: &str = "Stats";
pub const TAG_AUTH: &str = "Auth";

/// Upload folders created at start-up.
pub const MEDIA_FOLDERS: [&str; 4] = ["vehicles", "brands", "users", "uploads"];
pub const DEFAULT_MEDIA_FOLDER: &str = "uploads";
