//! Update trait for modifying entities.

use async_trait::async_trait;
use serde::Serialize;

use crate::client::HelpScoutClient;
use crate::error::Result;
use crate::traits::Get;

/// Update an existing entity.
///
/// # Example
///
/// ```ignore
/// use helpscout::{HelpScoutClient, Customer, CustomerUpdateParams, Update};
///
/// let client = HelpScoutClient::from_env()?;
/// let updated = Customer::update(
///     &client,
///     &42,
///     &CustomerUpdateParams {
///         organization: Some("Acme".to_string()),
///         ..Default::default()
///     },
/// ).await?;
/// assert!(updated);
/// ```
#[async_trait]
pub trait Update: Get {
    /// Parameters for the update.
    type Params: Serialize + Send + Sync;

    /// Update the entity. Returns `true` once the API accepts the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &HelpScoutClient, id: &Self::Id, params: &Self::Params) -> Result<bool> {
        let path = client.path(&Self::item_path(id));
        tracing::debug!(entity = Self::NAME, %id, "update");

        client.update_one(&path, params).await
    }
}
