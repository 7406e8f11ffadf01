//! Ownership authorization for mutations
//!
//! Posts and comments may only be mutated by their author. Every mutating
//! operation calls this after loading the resource and before writing.

use crate::error::{AppError, Result};
use uuid::Uuid;

/// Allow the operation only when the actor owns the resource
pub fn ensure_owner(actor_id: Uuid, owner_id: Uuid) -> Result<()> {
    if actor_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you do not have permission to modify this resource".into(),
        ))
    }
}
