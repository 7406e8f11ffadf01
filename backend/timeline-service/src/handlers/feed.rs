//! Feed handlers - paginated enriched post views

use crate::error::Result;
use crate::handlers::{AppState, PaginationParams};
use crate::middleware::Viewer;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// Get one page of the global feed
pub async fn get_feed(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let request = query.to_request(&state.feed_config);
    let page = state.feed.get_page(request, viewer.0).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Get one page of a single author's posts
pub async fn get_user_feed(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    query: web::Query<PaginationParams>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let request = query.to_request(&state.feed_config);
    let page = state
        .feed
        .get_page_by_author(*user_id, request, viewer.0)
        .await?;

    Ok(HttpResponse::Ok().json(page))
}
