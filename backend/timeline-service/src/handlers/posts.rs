//! Post handlers - HTTP endpoints for post lifecycle operations

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::{UserId, Viewer};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for creating a post
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub image_url: Option<String>,
}

/// Request body for updating a post
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: String,
    pub image_url: Option<String>,
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post = state
        .posts
        .create(user.0, &req.content, req.image_url.as_deref())
        .await?;

    let view = state.feed.get_by_id(post.id, Some(user.0)).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Get a single enriched post
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let view = state.feed.get_by_id(*post_id, viewer.0).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Update a post's content and image URL
pub async fn update_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let post = state
        .posts
        .update(*post_id, user.0, &req.content, req.image_url.as_deref())
        .await?;

    let view = state.feed.get_by_id(post.id, Some(user.0)).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Delete a post along with its comments and likes
pub async fn delete_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    state.posts.delete(*post_id, user.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
