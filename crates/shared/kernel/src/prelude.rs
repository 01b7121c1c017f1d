//! Everything a feature slice's handlers usually need.

pub use crate::pagination::{Page, PageRequest, Pagination};
pub use crate::security::ResourceGuard;
pub use crate::slug::{slugify, unique_slug};
pub use crate::validation::{FieldError, Validator};
pub use crate::safe_nanoid;

#[cfg(feature = "server")]
pub use crate::server::{AdminAccess, ApiError, ApiJson, ApiQuery, ApiResponse, ApiResult, ApiState};
