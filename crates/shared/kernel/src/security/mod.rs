pub mod resource;

pub use resource::{ResourceGuard, ResourceGuardError, ResourceGuardErrorExt};
