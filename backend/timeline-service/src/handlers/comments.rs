//! Comment handlers - HTTP endpoints for comment operations

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for creating a comment
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Request body for updating a comment
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Create a new comment under a post
pub async fn create_comment(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    user: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let view = state.comments.create(*post_id, user.0, &req.content).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Get the comment thread under a post, oldest first
pub async fn get_post_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = state.comments.list_by_post(*post_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Get a user's comments, most recent first
pub async fn get_user_comments(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = state.comments.list_by_author(*user_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Update a comment
pub async fn update_comment(
    state: web::Data<AppState>,
    comment_id: web::Path<Uuid>,
    user: UserId,
    req: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    let view = state
        .comments
        .update(*comment_id, user.0, &req.content)
        .await?;

    Ok(HttpResponse::Ok().json(view))
}

/// Delete a comment
pub async fn delete_comment(
    state: web::Data<AppState>,
    comment_id: web::Path<Uuid>,
    user: UserId,
) -> Result<HttpResponse> {
    state.comments.delete(*comment_id, user.0).await?;
    Ok(HttpResponse::NoContent().finish())
}
