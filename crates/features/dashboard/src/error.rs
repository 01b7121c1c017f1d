use autoani_events::EventBusError;
use autoani_kernel::server::ApiError;
use std::borrow::Cow;

#[autoani_derive::autoani_error]
pub enum DashboardError {
    #[error("Statistics query failed{}: {source}", format_context(.context))]
    Database { source: surrealdb::Error, context: Option<Cow<'static, str>> },

    #[error("Activity subscription failed{}: {source}", format_context(.context))]
    Events { source: EventBusError, context: Option<Cow<'static, str>> },

    #[error("Internal dashboard error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self::internal(err.to_string())
    }
}
