use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldError;

/// Three-state field for partial updates.
///
/// A key missing from the JSON body leaves the stored value alone, an explicit
/// `null` clears it, and any other value replaces it. Use with
/// `#[serde(default)]` so absent keys map to [`Patch::Unchanged`].
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unchanged
    }
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    /// Writes this patch into an optional slot.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Unchanged => {}
            Patch::Clear => *slot = None,
            Patch::Set(v) => *slot = Some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        })
    }
}

/// POST /artworks body. Every key is optional here so a missing `name`
/// surfaces as a field error instead of a JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateArtworkRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
}

/// A validated artwork ready to be stored. `name` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtwork {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
}

impl TryFrom<CreateArtworkRequest> for NewArtwork {
    type Error = Vec<FieldError>;

    fn try_from(req: CreateArtworkRequest) -> Result<Self, Self::Error> {
        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| vec![FieldError::body("name", "Name is required")])?
            .to_string();

        Ok(NewArtwork {
            name,
            description: req.description,
            category: req.category,
            size: req.size,
            price: req.price,
            location: req.location,
        })
    }
}

/// PUT /artworks/:id body.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArtworkRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub category: Patch<String>,
    #[serde(default)]
    pub size: Patch<String>,
    #[serde(default)]
    pub price: Patch<f64>,
    #[serde(default)]
    pub location: Patch<String>,
}

/// Validated field-set for a partial update. Name can be replaced but never cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtworkPatch {
    pub name: Option<String>,
    pub description: Patch<String>,
    pub category: Patch<String>,
    pub size: Patch<String>,
    pub price: Patch<f64>,
    pub location: Patch<String>,
}

impl ArtworkPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_unchanged()
            && self.category.is_unchanged()
            && self.size.is_unchanged()
            && self.price.is_unchanged()
            && self.location.is_unchanged()
    }
}

impl TryFrom<UpdateArtworkRequest> for ArtworkPatch {
    type Error = Vec<FieldError>;

    fn try_from(req: UpdateArtworkRequest) -> Result<Self, Self::Error> {
        let name = match req.name {
            Patch::Unchanged => None,
            Patch::Set(n) if !n.trim().is_empty() => Some(n.trim().to_string()),
            Patch::Set(_) | Patch::Clear => {
                return Err(vec![FieldError::body("name", "Name cannot be empty")]);
            }
        };

        Ok(ArtworkPatch {
            name,
            description: req.description,
            category: req.category,
            size: req.size,
            price: req.price,
            location: req.location,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: &'static str,
}
