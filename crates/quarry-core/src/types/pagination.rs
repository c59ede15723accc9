//! Page-number pagination on top of skip/take windows.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_PAGE_SIZE: u64 = 25;
/// Maximum page size.
const MAX_PAGE_SIZE: u64 = 100;

/// A 1-based page request, converted to a skip/take window by
/// [`Specification::page`](crate::specification::Specification::page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request; the page is at least 1 and the size is
    /// clamped to `1..=100`.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Number of rows on this page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results together with the size of the whole filtered set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T: Serialize> PageResponse<T> {
    /// Build a response for the window `skip`/`take` over `total_items` rows.
    ///
    /// A zero `take` yields a single empty page.
    pub fn from_window(items: Vec<T>, skip: u64, take: u64, total_items: u64) -> Self {
        if take == 0 {
            return Self {
                items,
                page: 1,
                page_size: 0,
                total_items,
                total_pages: 1,
                has_next: false,
                has_previous: false,
            };
        }

        let page = skip / take + 1;
        let total_pages = if total_items == 0 {
            1
        } else {
            total_items.div_ceil(take)
        };
        Self {
            items,
            page,
            page_size: take,
            total_items,
            total_pages,
            has_next: skip.saturating_add(take) < total_items,
            has_previous: skip > 0,
        }
    }

    /// A single page holding the whole result set.
    pub fn unpaged(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            page: 1,
            page_size: total,
            total_items: total,
            total_pages: 1,
            has_next: false,
            has_previous: false,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offsets() {
        let request = PageRequest::new(3, 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
        assert_eq!(PageRequest::new(0, 500), PageRequest::new(1, 100));
    }

    #[test]
    fn test_response_from_window() {
        let response = PageResponse::from_window(vec![4, 5, 6], 3, 3, 10);
        assert_eq!(response.page, 2);
        assert_eq!(response.total_pages, 4);
        assert!(response.has_next);
        assert!(response.has_previous);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let response = PageResponse::from_window(vec![10], 9, 3, 10);
        assert_eq!(response.page, 4);
        assert!(!response.has_next);
    }

    #[test]
    fn test_zero_take() {
        let response = PageResponse::<i32>::from_window(Vec::new(), 0, 0, 10);
        assert_eq!(response.page_size, 0);
        assert_eq!(response.total_items, 10);
        assert!(!response.has_next);
    }
}
