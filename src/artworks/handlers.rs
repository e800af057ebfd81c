use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{ArtworkPatch, CreateArtworkRequest, MessageResponse, NewArtwork, UpdateArtworkRequest},
    repo::Artwork,
    services::{load_owned, parse_id, NOT_FOUND},
};
use crate::{auth::jwt::AuthUser, error::AppError, extract::AppJson, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/artworks", get(list_artworks).post(create_artwork))
        .route("/artworks/:id", put(update_artwork).delete(delete_artwork))
}

#[instrument(skip(state))]
pub async fn list_artworks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Artwork>>, AppError> {
    let artworks = state.artworks.list_by_owner(user_id).await?;
    Ok(Json(artworks))
}

#[instrument(skip(state, payload))]
pub async fn create_artwork(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateArtworkRequest>,
) -> Result<Json<Artwork>, AppError> {
    let new = NewArtwork::try_from(payload).map_err(AppError::Validation)?;
    let artwork = state.artworks.insert(user_id, new).await?;
    info!(id = %artwork.id, %user_id, "artwork created");
    Ok(Json(artwork))
}

/// Existence and ownership are checked before the body is parsed.
#[instrument(skip(state, payload))]
pub async fn update_artwork(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<AppJson<UpdateArtworkRequest>, AppError>,
) -> Result<Json<Artwork>, AppError> {
    let id = parse_id(&id)?;
    load_owned(state.artworks.as_ref(), id, user_id).await?;

    let AppJson(payload) = payload?;
    let patch = ArtworkPatch::try_from(payload).map_err(AppError::Validation)?;

    // The record can vanish between the ownership check and the write.
    let artwork = state
        .artworks
        .update(id, patch)
        .await?
        .ok_or(AppError::NotFound(NOT_FOUND))?;
    info!(%id, %user_id, "artwork updated");
    Ok(Json(artwork))
}

#[instrument(skip(state))]
pub async fn delete_artwork(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    load_owned(state.artworks.as_ref(), id, user_id).await?;

    if !state.artworks.delete(id).await? {
        return Err(AppError::NotFound(NOT_FOUND));
    }
    info!(%id, %user_id, "artwork removed");
    Ok(Json(MessageResponse {
        msg: "Artwork removed",
    }))
}
