//! Page/limit parsing and the pagination envelope.

use crate::validation::{FieldError, Validator};
use serde::Serialize;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Applies defaults and checks `page >= 1` and `1 <= limit <= max_limit`.
    ///
    /// # Errors
    /// Returns one [`FieldError`] per offending parameter.
    pub fn parse(
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: u64,
        max_limit: u64,
    ) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new();
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or_else(|| i64::try_from(default_limit).unwrap_or(i64::MAX));

        if page < 1 {
            v.push("page", "Page must be a positive integer");
        }
        if limit < 1 || u64::try_from(limit).is_ok_and(|l| l > max_limit) {
            v.push("limit", format!("Limit must be between 1 and {max_limit}"));
        }
        v.finish()?;

        Ok(Self { page: page.unsigned_abs(), limit: limit.unsigned_abs() })
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct Pagination {
    pub current: u64,
    pub pages: u64,
    pub total: u64,
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(current: u64, limit: u64, total: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self { current, pages, total, limit }
    }
}

/// One page of records plus its [`Pagination`].
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub const fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self { data, pagination: Pagination::new(request.page, request.limit, total) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_offset() {
        let req = PageRequest::parse(None, None, 12, 50).unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: 12 });
        assert_eq!(req.offset(), 0);

        let req = PageRequest::parse(Some(3), Some(10), 12, 50).unwrap();
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn rejects_out_of_range() {
        let errors = PageRequest::parse(Some(0), Some(51), 12, 50).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "page");
        assert_eq!(errors[1].field, "limit");
        assert!(PageRequest::parse(None, Some(0), 12, 50).is_err());
        assert!(PageRequest::parse(None, Some(50), 12, 50).is_ok());
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(Pagination::new(1, 12, 12).pages, 1);
        assert_eq!(Pagination::new(1, 12, 13).pages, 2);
        assert_eq!(Pagination::new(1, 12, 0).pages, 0);
    }
}
