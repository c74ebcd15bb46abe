//! Page-number pagination primitives shared by Soapbox list endpoints.
//!
//! A [`PageRequest`] is parsed from the raw `page` and `limit` query values
//! at the HTTP boundary, converted to an offset for the store, and turned
//! back into a [`PageInfo`] envelope once the total row count is known.
//!
//! ```
//! use pagination::{PageInfo, PageRequest};
//!
//! let request = PageRequest::parse(Some("2"), Some("10")).expect("valid page");
//! assert_eq!(request.offset(), 10);
//!
//! let info = PageInfo::new(request, 25);
//! assert_eq!(info.total_pages, 3);
//! assert!(info.has_more);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller does not supply a `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size served; larger requests are clamped to this value.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised while parsing page parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The page number is not a positive integer.
    #[error("page must be a positive integer, got {value:?}")]
    InvalidPage {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The page size is not a positive integer.
    #[error("limit must be a positive integer, got {value:?}")]
    InvalidLimit {
        /// Raw value supplied by the caller.
        value: String,
    },
}

/// Validated one-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from already-numeric values.
    ///
    /// The limit is clamped to [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns an error when `page` or `limit` is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::InvalidPage {
                value: page.to_string(),
            });
        }
        if limit == 0 {
            return Err(PageRequestError::InvalidLimit {
                value: limit.to_string(),
            });
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }

    /// Parse optional raw query values, applying defaults for absent ones.
    ///
    /// # Errors
    ///
    /// Returns an error when a supplied value is not a positive integer.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PageRequestError> {
        let page = match page.map(str::trim) {
            None | Some("") => 1,
            Some(raw) => parse_positive(raw).ok_or_else(|| PageRequestError::InvalidPage {
                value: raw.to_owned(),
            })?,
        };
        let limit = match limit.map(str::trim) {
            None | Some("") => DEFAULT_PAGE_SIZE,
            Some(raw) => parse_positive(raw).ok_or_else(|| PageRequestError::InvalidLimit {
                value: raw.to_owned(),
            })?,
        };
        Self::new(page, limit)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|value| *value > 0)
}

/// Pagination envelope returned next to a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Total number of rows across all pages.
    pub total: u64,
    /// Number of pages needed to cover `total` rows.
    pub total_pages: u64,
    /// Whether a page after this one exists.
    pub has_more: bool,
}

impl PageInfo {
    /// Describe the page served for `request` given the total row count.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.limit));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_more: u64::from(request.page) < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page parsing and envelope arithmetic.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn absent_values_use_defaults() {
        let request = PageRequest::parse(None, None).expect("defaults");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    #[case(Some("0"), None)]
    #[case(Some("-1"), None)]
    #[case(Some("two"), None)]
    #[case(None, Some("0"))]
    #[case(None, Some("ten"))]
    fn rejects_non_positive_values(#[case] page: Option<&str>, #[case] limit: Option<&str>) {
        assert!(PageRequest::parse(page, limit).is_err());
    }

    #[rstest]
    fn invalid_page_error_names_the_value() {
        let err = PageRequest::parse(Some("abc"), None).expect_err("invalid page");
        assert_eq!(
            err,
            PageRequestError::InvalidPage {
                value: "abc".to_owned()
            }
        );
    }

    #[rstest]
    fn oversized_limit_is_clamped() {
        let request = PageRequest::parse(Some("1"), Some("5000")).expect("clamped");
        assert_eq!(request.limit(), MAX_PAGE_SIZE);
    }

    #[rstest]
    #[case(1, 20, 0)]
    #[case(3, 20, 40)]
    #[case(2, 7, 7)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        let request = PageRequest::new(page, limit).expect("valid");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(1, 10, 0, 0, false)]
    #[case(1, 10, 10, 1, false)]
    #[case(1, 10, 11, 2, true)]
    #[case(2, 10, 11, 2, false)]
    fn page_info_counts_pages(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total: u64,
        #[case] total_pages: u64,
        #[case] has_more: bool,
    ) {
        let info = PageInfo::new(PageRequest::new(page, limit).expect("valid"), total);
        assert_eq!(info.total_pages, total_pages);
        assert_eq!(info.has_more, has_more);
    }

    #[rstest]
    fn page_info_serialises_camel_case() {
        let info = PageInfo::new(PageRequest::default(), 45);
        let value = serde_json::to_value(info).expect("serialise");
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["hasMore"], true);
    }
}
