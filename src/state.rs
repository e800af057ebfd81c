use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::artworks::{
    memory::MemoryArtworkStore,
    repo::{ArtworkStore, PgArtworkStore},
};
use crate::auth::{
    jwt::JwtKeys,
    repo::{MemoryUserStore, PgUserStore, UserStore},
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtKeys,
    pub artworks: Arc<dyn ArtworkStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let Some(database_url) = config.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; using in-memory stores, data is lost on exit");
            return Ok(Self::in_memory(&config));
        };

        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self::from_parts(
            JwtKeys::new(&config.jwt),
            Arc::new(PgArtworkStore::new(db.clone())),
            Arc::new(PgUserStore::new(db)),
        ))
    }

    pub fn in_memory(config: &AppConfig) -> Self {
        Self::from_parts(
            JwtKeys::new(&config.jwt),
            Arc::new(MemoryArtworkStore::default()),
            Arc::new(MemoryUserStore::default()),
        )
    }

    pub fn from_parts(
        jwt: JwtKeys,
        artworks: Arc<dyn ArtworkStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            jwt,
            artworks,
            users,
        }
    }
}
