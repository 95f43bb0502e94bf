//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Optional case-insensitive search term.
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
        }
    }
}

impl PageRequest {
    /// Clamps out-of-range values: page below 1 becomes 1, and a page size
    /// outside `1..=MAX_PER_PAGE` falls back to the default.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.page < 1 {
            self.page = default_page();
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            self.per_page = default_per_page();
        }
        self.search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }

    /// Returns the search term wrapped for a substring `LIKE` match.
    /// `\`, `%` and `_` are escaped with a backslash, so they match literally.
    /// `\\`, `%` and `_` are escaped with a backslash, so they match literally.
    #[must_use]
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 || per_page == 0 {
            1
        } else {
            total.div_ceil(u64::from(per_page))
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Maps the items while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 1)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(101, 25, 5)]
    fn test_total_pages(#[case] total: u64, #[case] per_page: u32, #[case] expected: u64) {
        let page = PageResponse::<()>::new(vec![], 1, per_page, total);
        assert_eq!(page.meta.total_pages, expected);
    }

    #[test]
    fn test_offset_and_limit() {
        let req = PageRequest {
            page: 3,
            per_page: 20,
            search: None,
        };
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_normalized_clamps_out_of_range() {
        let req = PageRequest {
            page: 0,
            per_page: 500,
            search: Some("   ".to_string()),
        }
        .normalized();

        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 10);
        assert_eq!(req.search, None);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_like_pattern() {
        let req = PageRequest {
            search: Some(" kas ".to_string()),
            ..PageRequest::default()
        }
        .normalized();
        assert_eq!(req.like_pattern().as_deref(), Some("%kas%"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let req = PageRequest {
            search: Some(r"1_1 50% a\b".to_string()),
            ..PageRequest::default()
        }
        .normalized();
        assert_eq!(req.like_pattern().as_deref(), Some(r"%1\_1 50\% a\\b%"));
    }
}
