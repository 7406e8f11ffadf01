//! Input validation for user-supplied fields
//!
//! Field bounds mirror the column definitions in the migrations; every
//! create/update operation calls these before touching a repository.

use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum post content length in characters
pub const POST_CONTENT_MAX: usize = 1000;
/// Maximum comment content length in characters
pub const COMMENT_CONTENT_MAX: usize = 500;
/// Display name bounds in characters
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
/// Minimum password length
pub const PASSWORD_MIN: usize = 6;

// Compile regex patterns once at startup. The pattern is hardcoded and
// always valid, so expect() cannot fire outside of a source bug.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Validate post content: non-empty after trimming, bounded length
pub fn validate_post_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("post content is required".into()));
    }
    if content.chars().count() > POST_CONTENT_MAX {
        return Err(AppError::Validation(format!(
            "post content must be at most {POST_CONTENT_MAX} characters"
        )));
    }
    Ok(())
}

/// Validate comment content: non-empty after trimming, bounded length
pub fn validate_comment_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("comment content is required".into()));
    }
    if content.chars().count() > COMMENT_CONTENT_MAX {
        return Err(AppError::Validation(format!(
            "comment content must be at most {COMMENT_CONTENT_MAX} characters"
        )));
    }
    Ok(())
}

/// Validate display name length bounds
pub fn validate_display_name(name: &str) -> Result<()> {
    let len = name.trim().chars().count();
    if len < NAME_MIN || len > NAME_MAX {
        return Err(AppError::Validation(format!(
            "name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(())
}

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err(AppError::Validation("email must be valid".into()));
    }
    Ok(())
}

/// Validate password minimum length
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}
