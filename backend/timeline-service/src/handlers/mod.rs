/// HTTP handlers for the timeline API
///
/// Handlers stay thin: extract identity, call the service, serialize the
/// result. Error payloads come from `AppError`'s `ResponseError` impl.
pub mod comments;
pub mod feed;
pub mod likes;
pub mod posts;
pub mod users;

// Re-export handler functions at module level
pub use comments::{
    create_comment, delete_comment, get_post_comments, get_user_comments, update_comment,
};
pub use feed::{get_feed, get_user_feed};
pub use likes::{check_like, toggle_like};
pub use posts::{create_post, delete_post, get_post, update_post};
pub use users::{get_me, get_user, register, search_users, update_me};

use crate::config::FeedConfig;
use crate::db::PageRequest;
use crate::services::{CommentService, FeedService, LikeService, PostService, UserService};
use serde::Deserialize;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub feed: FeedService,
    pub feed_config: FeedConfig,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// Resolve against configured defaults and the page-size cap
    pub fn to_request(&self, config: &FeedConfig) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.per_page.unwrap_or(config.default_page_size),
        )
        .capped(config.max_page_size)
    }
}
