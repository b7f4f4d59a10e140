//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::HelpScoutClient;
use crate::error::Result;
use crate::pagination::{Limit, Page, QueryParams};
use crate::traits::Resource;

/// List/filter entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use helpscout::{HelpScoutClient, Customer, CustomerQuery, List, Limit};
///
/// let client = HelpScoutClient::from_env()?;
///
/// // Fetch a single page
/// let page = Customer::list_page(&client, &CustomerQuery::default(), 1).await?;
///
/// // Fetch up to 120 customers across pages
/// let customers = Customer::list(&client, &CustomerQuery::default(), Limit::AtMost(120)).await?;
/// ```
#[async_trait]
pub trait List: Resource {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// Collection path for this query, without version suffix.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the query cannot be served by the
    /// client's API version.
    fn collection_path(client: &HelpScoutClient, query: &Self::Query) -> Result<String>;

    /// Filter parameters for this query. `page` is managed by the caller.
    fn query_params(_client: &HelpScoutClient, _query: &Self::Query) -> QueryParams {
        QueryParams::new()
    }

    /// List entities matching the query (single page).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &HelpScoutClient,
        query: &Self::Query,
        page: u32,
    ) -> Result<Page<Self>> {
        let path = client.path(&Self::collection_path(client, query)?);
        let params = Self::query_params(client, query).with("page", page);

        client.fetch_page(&path, &params).await?.try_map(Self::from_item)
    }

    /// List entities matching the query across pages, up to `limit`.
    ///
    /// Page failures follow the client's [`ErrorPolicy`](crate::ErrorPolicy).
    ///
    /// # Errors
    ///
    /// Returns an error if a page request fails under the strict policy, or
    /// an item cannot be mapped.
    async fn list(client: &HelpScoutClient, query: &Self::Query, limit: Limit) -> Result<Vec<Self>> {
        let path = client.path(&Self::collection_path(client, query)?);
        let params = Self::query_params(client, query);
        tracing::debug!(entity = Self::NAME, ?limit, "list");

        client
            .fetch_all(&path, &params, limit)
            .await?
            .into_iter()
            .map(Self::from_item)
            .collect()
    }

    /// Server-reported number of entities matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn count(client: &HelpScoutClient, query: &Self::Query) -> Result<u64> {
        let path = client.path(&Self::collection_path(client, query)?);
        let params = Self::query_params(client, query);
        client.fetch_count(&path, &params).await
    }
}
