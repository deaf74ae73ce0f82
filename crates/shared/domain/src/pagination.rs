//! Pagination for user listings.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Largest offset or limit the store accepts (a signed 64-bit column).
const MAX_ROWS: u64 = i64::MAX as u64;

/// Requested page. `page == 0` or `limit == 0` asks for everything on one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
}

impl Page {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Everything on a single page.
    pub fn all() -> Self {
        Self::default()
    }

    /// True when no offset/limit should be applied.
    pub fn is_unbounded(&self) -> bool {
        self.page == 0 || self.limit == 0
    }

    /// Row offset for the database query
    ///
    /// # Errors
    /// Returns `DomainError::Validation` when the offset or the limit does not
    /// fit a signed 64-bit row count.
    pub fn offset(&self) -> DomainResult<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .filter(|offset| *offset <= MAX_ROWS && self.limit <= MAX_ROWS)
            .ok_or_else(|| DomainError::validation("page out of range"))
    }

    /// Reject bounded pages whose offset cannot be expressed.
    pub fn checked(self) -> DomainResult<Self> {
        if !self.is_unbounded() {
            self.offset()?;
        }
        Ok(self)
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self, total: u64) -> u64 {
        if self.is_unbounded() {
            1
        } else {
            total.div_ceil(self.limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_when_page_or_limit_is_zero() {
        assert!(Page::new(0, 10).is_unbounded());
        assert!(Page::new(3, 0).is_unbounded());
        assert!(!Page::new(1, 10).is_unbounded());
        assert_eq!(Page::all().page_count(42), 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Page::new(1, 10).offset(), Ok(0));
        assert_eq!(Page::new(3, 10).offset(), Ok(20));
    }

    #[test]
    fn test_offset_out_of_range() {
        let err = Page::new(u64::MAX, 10).offset().unwrap_err();
        assert_eq!(err, DomainError::validation("page out of range"));

        assert!(Page::new(2, MAX_ROWS + 1).offset().is_err());
        assert!(Page::new(u64::MAX, 10).checked().is_err());
        assert_eq!(Page::new(2, MAX_ROWS).offset(), Ok(MAX_ROWS));
    }

    #[test]
    fn test_unbounded_page_is_always_in_range() {
        assert!(Page::new(0, u64::MAX).checked().is_ok());
        assert!(Page::new(u64::MAX, 0).checked().is_ok());
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::new(1, 10);
        assert_eq!(page.page_count(0), 0);
        assert_eq!(page.page_count(10), 1);
        assert_eq!(page.page_count(11), 2);
        assert_eq!(page.page_count(25), 3);
    }
}
