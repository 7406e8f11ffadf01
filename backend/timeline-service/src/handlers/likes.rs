//! Like handlers - toggle and check endpoints
//!
//! The toggle always acts on the authenticated caller's own id; there is
//! no request field for liking on behalf of another user.

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::UserId;
use crate::services::LikeState;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

/// Response for a toggle, carrying the resulting state and the live count
#[derive(Debug, Serialize)]
pub struct LikeToggleResponse {
    pub state: LikeState,
    pub liked: bool,
    pub like_count: i64,
}

/// Response for a like check
#[derive(Debug, Serialize)]
pub struct LikeCheckResponse {
    pub liked: bool,
}

/// POST /likes/toggle/{post_id} - flip the caller's like on a post
pub async fn toggle_like(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let like_state = state.likes.toggle(user.0, *post_id).await?;
    let like_count = state.likes.count_for_post(*post_id).await?;

    Ok(HttpResponse::Ok().json(LikeToggleResponse {
        state: like_state,
        liked: like_state == LikeState::Liked,
        like_count,
    }))
}

/// GET /likes/check/{post_id} - whether the caller has liked a post
pub async fn check_like(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    let liked = state.likes.is_liked(user.0, *post_id).await?;
    Ok(HttpResponse::Ok().json(LikeCheckResponse { liked }))
}
