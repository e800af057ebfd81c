use tracing::warn;
use uuid::Uuid;

use super::repo::{Artwork, ArtworkStore};
use crate::error::AppError;

pub const NOT_FOUND: &str = "Artwork not found";
pub const NOT_AUTHORIZED: &str = "Not authorized";

/// Path ids that are not UUIDs cannot name a stored artwork.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(NOT_FOUND))
}

/// Loads an artwork and checks that `caller` owns it.
pub async fn load_owned(
    store: &dyn ArtworkStore,
    id: Uuid,
    caller: Uuid,
) -> Result<Artwork, AppError> {
    let artwork = store
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;

    if artwork.owner != caller {
        warn!(%id, %caller, owner = %artwork.owner, "caller does not own artwork");
        return Err(AppError::Unauthorized(NOT_AUTHORIZED));
    }
    Ok(artwork)
}
