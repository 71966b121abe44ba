//! Satellite records owned by a product: category, material and media.

use serde::{Deserialize, Deserializer, Serialize};

use catalog_core::{CategoryId, Document, DomainError, DomainResult, MaterialId, MediaId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_name("category", &self.name)
    }
}

impl Document for Category {
    type Id = CategoryId;

    const COLLECTION: &'static str = "categories";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_name("material", &self.name)
    }
}

impl Document for Material {
    type Id = MaterialId;

    const COLLECTION: &'static str = "materials";
}

/// Product image. The URL is optional; a product may exist without a picture.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub url: Option<String>,
}

impl Media {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }

    /// Always succeeds; kept so all satellites validate the same way.
    pub fn validate(&self) -> DomainResult<()> {
        Ok(())
    }
}

impl Document for Media {
    type Id = MediaId;

    const COLLECTION: &'static str = "media";
}

/// Partial update of an owned record, merged into the stored copy.
///
/// Absent fields keep their stored value.
pub trait RecordPatch<T> {
    fn validate(&self) -> DomainResult<()>;

    fn apply_to(&self, record: &mut T);

    /// True when applying the patch would change nothing.
    fn is_empty(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl RecordPatch<Category> for CategoryPatch {
    fn validate(&self) -> DomainResult<()> {
        match &self.name {
            Some(name) => require_name("category", name),
            None => Ok(()),
        }
    }

    fn apply_to(&self, record: &mut Category) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MaterialPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl MaterialPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl RecordPatch<Material> for MaterialPatch {
    fn validate(&self) -> DomainResult<()> {
        match &self.name {
            Some(name) => require_name("material", name),
            None => Ok(()),
        }
    }

    fn apply_to(&self, record: &mut Material) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

/// `url` absent keeps the stored picture; `"url": null` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MediaPatch {
    #[serde(default, deserialize_with = "present")]
    pub url: Option<Option<String>>,
}

impl RecordPatch<Media> for MediaPatch {
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }

    fn apply_to(&self, record: &mut Media) {
        if let Some(url) = &self.url {
            record.url = url.clone();
        }
    }

    fn is_empty(&self) -> bool {
        self.url.is_none()
    }
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn require_name(kind: &str, name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation(format!("{kind} name cannot be empty")));
    }
    Ok(())
}
