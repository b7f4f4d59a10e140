//! Mapping decoded JSON items to entity types.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// An entity that can be built from a decoded item.
///
/// The default mapping is plain serde deserialisation; types whose two API
/// generations disagree on shape override [`from_item`](Resource::from_item).
pub trait Resource: DeserializeOwned + Send + Sized {
    /// Human-readable name used in error messages.
    const NAME: &'static str;

    /// Convert one decoded item into this entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not have this entity's shape.
    fn from_item(item: Value) -> Result<Self> {
        Ok(serde_json::from_value(item)?)
    }
}
