use autoani_brands::BrandError;
use autoani_content::ContentError;
use autoani_dashboard::DashboardError;
use autoani_media::MediaError;
use autoani_vehicles::VehicleError;
use std::borrow::Cow;

/// A slice that failed to start.
#[autoani_derive::autoani_error]
pub enum BootstrapError {
    #[error("Vehicles slice failed{}: {source}", format_context(.context))]
    Vehicles { source: VehicleError, context: Option<Cow<'static, str>> },

    #[error("Brands slice failed{}: {source}", format_context(.context))]
    Brands { source: BrandError, context: Option<Cow<'static, str>> },

    #[error("Media slice failed{}: {source}", format_context(.context))]
    Media { source: MediaError, context: Option<Cow<'static, str>> },

    #[error("Content slice failed{}: {source}", format_context(.context))]
    Content { source: ContentError, context: Option<Cow<'static, str>> },

    #[error("Dashboard slice failed{}: {source}", format_context(.context))]
    Dashboard { source: DashboardError, context: Option<Cow<'static, str>> },
}
