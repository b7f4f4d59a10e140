//! Get trait for fetching single entities.

use std::fmt::Display;

use async_trait::async_trait;

use crate::client::HelpScoutClient;
use crate::error::Result;
use crate::traits::Resource;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use helpscout::{HelpScoutClient, Mailbox, Get};
///
/// let client = HelpScoutClient::from_env()?;
/// let mailbox = Mailbox::get(&client, 42).await?;
/// ```
#[async_trait]
pub trait Get: Resource {
    /// The ID type for this entity.
    type Id: Display + Send + Sync;

    /// Path of a single entity, without version suffix (e.g. `mailboxes/42`).
    fn item_path(id: &Self::Id) -> String;

    /// Fetch the entity by ID.
    ///
    /// Returns `Ok(None)` if the API answers with an empty item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the item cannot be mapped.
    async fn get(client: &HelpScoutClient, id: Self::Id) -> Result<Option<Self>> {
        let path = client.path(&Self::item_path(&id));
        tracing::debug!(entity = Self::NAME, %id, "get");

        client
            .fetch_one(&path, None)
            .await?
            .map(Self::from_item)
            .transpose()
    }
}
