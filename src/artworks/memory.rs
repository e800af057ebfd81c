use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::dto::{ArtworkPatch, NewArtwork};
use super::repo::{Artwork, ArtworkStore};

/// Process-local store, kept in insertion order.
#[derive(Default)]
pub struct MemoryArtworkStore {
    rows: RwLock<Vec<Artwork>>,
}

#[async_trait]
impl ArtworkStore for MemoryArtworkStore {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Artwork>> {
        let rows = self.rows.read().await;
        // Reverse first so the stable sort keeps later inserts ahead on equal timestamps.
        let mut out: Vec<Artwork> = rows.iter().rev().filter(|a| a.owner == owner).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Artwork>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, owner: Uuid, artwork: NewArtwork) -> anyhow::Result<Artwork> {
        let record = Artwork {
            id: Uuid::new_v4(),
            owner,
            name: artwork.name,
            description: artwork.description,
            category: artwork.category,
            size: artwork.size,
            price: artwork.price,
            location: artwork.location,
            created_at: OffsetDateTime::now_utc(),
        };
        self.rows.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: ArtworkPatch) -> anyhow::Result<Option<Artwork>> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = name;
        }
        patch.description.apply(&mut row.description);
        patch.category.apply(&mut row.category);
        patch.size.apply(&mut row.size);
        patch.price.apply(&mut row.price);
        patch.location.apply(&mut row.location);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|a| a.id != id);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artworks::dto::Patch;

    fn named(name: &str) -> NewArtwork {
        NewArtwork {
            name: name.into(),
            description: None,
            category: None,
            size: None,
            price: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn list_is_per_owner_and_newest_first() {
        let store = MemoryArtworkStore::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.insert(a, named("first")).await.unwrap();
        store.insert(b, named("other")).await.unwrap();
        store.insert(a, named("second")).await.unwrap();

        let names: Vec<_> = store
            .list_by_owner(a)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn update_touches_only_patched_fields() {
        let store = MemoryArtworkStore::default();
        let mut new = named("Sunset");
        new.description = Some("warm".into());
        new.location = Some("hall".into());
        let rec = store.insert(Uuid::new_v4(), new).await.unwrap();

        let patch = ArtworkPatch {
            price: Patch::Set(200.0),
            location: Patch::Clear,
            ..Default::default()
        };
        let updated = store.update(rec.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "Sunset");
        assert_eq!(updated.description.as_deref(), Some("warm"));
        assert_eq!(updated.price, Some(200.0));
        assert_eq!(updated.location, None);
        assert_eq!(updated.created_at, rec.created_at);
    }

    #[tokio::test]
    async fn update_and_delete_missing_id() {
        let store = MemoryArtworkStore::default();
        let id = Uuid::new_v4();
        assert!(store.update(id, ArtworkPatch::default()).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }
}
