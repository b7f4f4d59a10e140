//! Create trait for adding new entities.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::client::{Created, HelpScoutClient};
use crate::envelope::ApiVersion;
use crate::error::Result;
use crate::pagination::QueryParams;
use crate::traits::Resource;

/// Create a new entity.
#[async_trait]
pub trait Create: Resource + Serialize + Sync {
    /// Collection path new entities are posted to, without version suffix.
    const CREATE_PATH: &'static str;

    /// Check required fields before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`HelpScoutError::Validation`](crate::HelpScoutError::Validation)
    /// naming the missing field.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Extra parameters for the create request (e.g. `reload=true`).
    fn create_params(_client: &HelpScoutClient) -> Option<QueryParams> {
        None
    }

    /// Request body for the given API version. Defaults to the serialised entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be serialised.
    fn create_body(&self, _version: ApiVersion) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Create the entity.
    ///
    /// Returns the created item when the API echoes it, otherwise its URL.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request if a required field is
    /// missing, or a classified error if the API rejects the entity.
    async fn create(client: &HelpScoutClient, entity: &Self) -> Result<Created> {
        entity.validate()?;
        let path = client.path(Self::CREATE_PATH);
        let params = Self::create_params(client);
        tracing::debug!(entity = Self::NAME, "create");

        let body = entity.create_body(client.api_version())?;
        client.create_one(&path, params.as_ref(), &body).await
    }
}
