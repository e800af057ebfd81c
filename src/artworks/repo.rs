use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{
    query_builder::Separated, Encode, FromRow, PgPool, Postgres, QueryBuilder, Type,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{ArtworkPatch, NewArtwork, Patch};

/// One catalogued piece. `owner` is set at creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Persistence seam for artworks. Each call is a single-record operation;
/// no cross-call transaction is implied.
#[async_trait]
pub trait ArtworkStore: Send + Sync {
    /// All artworks of `owner`, newest first.
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Artwork>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Artwork>>;
    async fn insert(&self, owner: Uuid, artwork: NewArtwork) -> anyhow::Result<Artwork>;
    /// Applies `patch` and returns the updated record, `None` if `id` is gone.
    async fn update(&self, id: Uuid, patch: ArtworkPatch) -> anyhow::Result<Option<Artwork>>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

const COLUMNS: &str = "id, owner, name, description, category, size, price, location, created_at";

#[derive(Clone)]
pub struct PgArtworkStore {
    db: PgPool,
}

impl PgArtworkStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn push_patch<'args, T>(
    set: &mut Separated<'_, 'args, Postgres, &'static str>,
    column: &str,
    patch: Patch<T>,
) where
    T: 'args + Encode<'args, Postgres> + Send + Type<Postgres>,
{
    match patch {
        Patch::Unchanged => {}
        Patch::Clear => {
            set.push(format!("{column} = NULL"));
        }
        Patch::Set(value) => {
            set.push(format!("{column} = ")).push_bind_unseparated(value);
        }
    }
}

/// Single `UPDATE ... RETURNING` over the patched columns only. `None` for an
/// empty patch, which has nothing to write.
fn build_update(id: Uuid, patch: ArtworkPatch) -> Option<QueryBuilder<'static, Postgres>> {
    if patch.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::<Postgres>::new("UPDATE artworks SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        push_patch(&mut set, "description", patch.description);
        push_patch(&mut set, "category", patch.category);
        push_patch(&mut set, "size", patch.size);
        push_patch(&mut set, "price", patch.price);
        push_patch(&mut set, "location", patch.location);
    }
    qb.push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING ")
        .push(COLUMNS);
    Some(qb)
}

#[async_trait]
impl ArtworkStore for PgArtworkStore {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Artwork>> {
        let rows = sqlx::query_as::<_, Artwork>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM artworks
            WHERE owner = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await
        .context("list artworks by owner")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Artwork>> {
        let row = sqlx::query_as::<_, Artwork>(&format!(
            "SELECT {COLUMNS} FROM artworks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find artwork by id")?;
        Ok(row)
    }

    async fn insert(&self, owner: Uuid, artwork: NewArtwork) -> anyhow::Result<Artwork> {
        let row = sqlx::query_as::<_, Artwork>(&format!(
            r#"
            INSERT INTO artworks (id, owner, name, description, category, size, price, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(artwork.name)
        .bind(artwork.description)
        .bind(artwork.category)
        .bind(artwork.size)
        .bind(artwork.price)
        .bind(artwork.location)
        .fetch_one(&self.db)
        .await
        .context("insert artwork")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: ArtworkPatch) -> anyhow::Result<Option<Artwork>> {
        let Some(mut qb) = build_update(id, patch) else {
            return self.find_by_id(id).await;
        };
        let row = qb
            .build_query_as::<Artwork>()
            .fetch_optional(&self.db)
            .await
            .context("update artwork")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete artwork")?;
        Ok(res.rows_affected() > 0)
    }
}
