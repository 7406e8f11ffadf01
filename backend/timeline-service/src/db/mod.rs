//! Database access layer
//!
//! Each aggregate gets a repository trait plus its PostgreSQL
//! implementation; services depend only on the traits.

pub mod comment_repo;
pub mod like_repo;
pub mod post_repo;
pub mod user_repo;

pub use comment_repo::{CommentRepository, PgCommentRepository};
pub use like_repo::{LikeRepository, PgLikeRepository};
pub use post_repo::{PgPostRepository, PostRepository};
pub use user_repo::{PgUserRepository, UserRepository};

use serde::{Deserialize, Serialize};

/// Zero-based page request with a bounded page size
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Build a request, clamping negative pages and non-positive sizes
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(0),
            per_page: per_page.max(1),
        }
    }

    /// Cap the page size at the configured maximum
    pub fn capped(self, max_page_size: i64) -> Self {
        Self {
            page: self.page,
            per_page: self.per_page.min(max_page_size),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        self.page * self.per_page
    }
}

/// One bounded slice of an ordered result set
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let has_more = request.offset() + request.limit() < total;
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            has_more,
        }
    }

    /// Map the items while keeping the page envelope
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_page_times_size() {
        let req = PageRequest::new(3, 20);
        assert_eq!(req.offset(), 60);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_negative_page_clamps_to_zero() {
        let req = PageRequest::new(-1, 0);
        assert_eq!(req.page, 0);
        assert_eq!(req.per_page, 1);
    }

    #[test]
    fn test_capped_page_size() {
        let req = PageRequest::new(0, 500).capped(100);
        assert_eq!(req.per_page, 100);
    }

    #[test]
    fn test_has_more_indicator() {
        let full = Page::new(vec![1, 2], 5, PageRequest::new(0, 2));
        assert!(full.has_more);

        let last = Page::new(vec![5], 5, PageRequest::new(2, 2));
        assert!(!last.has_more);

        let empty: Page<i32> = Page::new(vec![], 0, PageRequest::new(0, 2));
        assert!(!empty.has_more);
    }
}
