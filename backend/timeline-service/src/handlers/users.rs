//! User handlers - registration, profiles, search

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::UserId;
use crate::models::UpdateProfile;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for profile updates; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_photo_url: Option<String>,
}

/// Query parameters for user search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<i64>,
}

/// Register a new account
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let summary = state
        .users
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok(HttpResponse::Created().json(summary))
}

/// Get the caller's own profile summary
pub async fn get_me(state: web::Data<AppState>, user: UserId) -> Result<HttpResponse> {
    let summary = state.users.get_by_id(user.0).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Update the caller's own profile
pub async fn update_me(
    state: web::Data<AppState>,
    user: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let changes = UpdateProfile {
        name: req.name,
        bio: req.bio,
        location: req.location,
        avatar_url: req.avatar_url,
        cover_photo_url: req.cover_photo_url,
    };

    let summary = state.users.update_profile(user.0, user.0, &changes).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Get a user's public profile summary
pub async fn get_user(state: web::Data<AppState>, user_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let summary = state.users.get_by_id(*user_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Search users by display name
pub async fn search_users(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let users = state.users.search(&query.q, limit).await?;

    Ok(HttpResponse::Ok().json(users))
}
