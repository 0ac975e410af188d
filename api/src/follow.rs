//! Follow relationships between authors.

use crate::{errors::ApiError, store::Store};
use tracing::{debug, info};
use uuid::Uuid;

/// Starts `follower` following `target`.
///
/// Repeating an existing follow changes nothing and following yourself is
/// ignored. Returns `true` only when a new edge was stored.
pub fn follow(store: &Store, follower: Uuid, target: Uuid) -> bool {
    if follower == target {
        debug!("Ignoring self-follow by {}", follower);
        return false;
    }

    let created = store.insert_follow(follower, target);
    if created {
        info!("{} now follows {}", follower, target);
    }
    created
}

pub fn unfollow(store: &Store, follower: Uuid, target: Uuid) -> Result<(), ApiError> {
    store
        .remove_follow(follower, target)
        .ok_or(ApiError::NotFound)?;

    info!("{} unfollowed {}", follower, target);

    Ok(())
}

pub fn is_following(store: &Store, follower: Uuid, target: Uuid) -> bool {
    store.follow_exists(follower, target)
}

/// Follow status shown on a profile; anonymous viewers follow nobody
pub fn following_status(store: &Store, viewer: Option<Uuid>, target: Uuid) -> bool {
    viewer.is_some_and(|v| v != target && is_following(store, v, target))
}
