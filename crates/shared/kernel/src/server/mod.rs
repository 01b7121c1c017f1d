//! HTTP plumbing shared by every feature slice.

mod access;
mod error;
mod extract;
mod health;
mod response;
mod router;
mod state;

pub use access::AdminAccess;
pub use error::{ApiError, ApiErrorExt, ApiResult};
pub use extract::{ApiJson, ApiQuery};
pub use response::ApiResponse;
pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
