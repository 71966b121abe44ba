//! Stored documents.
//!
//! A `Document` is the payload of one collection; a `Record` is that payload
//! once the store has assigned it an identifier. References between
//! collections are plain ids, never embedded documents.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::id::RecordId;

/// Payload type stored in its own collection.
pub trait Document:
    Clone + core::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Id: RecordId;

    /// Collection (table) name. Must be a plain lowercase identifier.
    const COLLECTION: &'static str;
}

/// A document with its store-assigned identifier.
///
/// Serializes flat: `{ "_id": "...", <document fields> }`, the shape the
/// storefront reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Record<T: Document> {
    #[serde(rename = "_id")]
    pub id: T::Id,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Document> Record<T> {
    pub fn new(id: T::Id, data: T) -> Self {
        Self { id, data }
    }
}
