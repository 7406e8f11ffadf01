/// Business logic layer for the timeline service
///
/// This module provides high-level operations:
/// - User service: registration, profiles, search
/// - Post service: post lifecycle with ownership checks
/// - Comment service: comment threads under posts
/// - Like service: idempotent like toggling
/// - Feed service: paginated enriched post views
pub mod comments;
pub mod feed;
pub mod likes;
pub mod ownership;
pub mod posts;
pub mod users;

// Re-export commonly used services
pub use comments::{CommentService, CommentView};
pub use feed::{FeedService, PostView};
pub use likes::{LikeService, LikeState};
pub use posts::PostService;
pub use users::{UserService, UserSummary};
