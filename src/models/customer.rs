//! Customer model and trait implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::HelpScoutClient;
use crate::envelope::ApiVersion;
use crate::error::{HelpScoutError, Result};
use crate::models::hoist_embedded;
use crate::models::user::full_name;
use crate::pagination::{Limit, QueryParams};
use crate::traits::{Create, Get, List, Resource, Update};

/// A Help Scout customer.
///
/// Customers are returned by creation date, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: u64,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub photo_url: Option<String>,

    /// Photo source (e.g. "gravatar", "twitter").
    #[serde(default)]
    pub photo_type: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub age: Option<String>,

    #[serde(default)]
    pub organization: Option<String>,

    #[serde(default)]
    pub job_title: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, alias = "updatedAt")]
    pub modified_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub emails: Vec<CustomerEmail>,
}

/// An email address on a customer record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEmail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub value: String,

    /// "work", "home" or "other". v2 calls this `type`.
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Customer {
    /// First and last name, space separated.
    pub fn full_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
    }

    /// The first email address on record.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(|e| e.value.as_str())
    }
}

/// A customer to be created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<CustomerEmail>,
}

impl NewCustomer {
    /// A customer with a first name and one email address.
    pub fn new(first_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            emails: vec![CustomerEmail {
                value: email.into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }
}

/// Parameters for updating a customer.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// Query parameters for listing customers.
///
/// Filters combine; all are optional.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Only customers with conversations in this mailbox.
    pub mailbox_id: Option<u64>,
}

impl Resource for Customer {
    const NAME: &'static str = "customer";

    fn from_item(item: Value) -> Result<Self> {
        Ok(serde_json::from_value(hoist_embedded(item, "emails"))?)
    }
}

impl Resource for NewCustomer {
    const NAME: &'static str = "customer";
}

impl Get for Customer {
    type Id = u64;

    fn item_path(id: &u64) -> String {
        format!("customers/{id}")
    }
}

impl List for Customer {
    type Query = CustomerQuery;

    fn collection_path(client: &HelpScoutClient, query: &CustomerQuery) -> Result<String> {
        Ok(match (client.api_version(), query.mailbox_id) {
            (ApiVersion::V1, Some(mailbox)) => format!("mailboxes/{mailbox}/customers"),
            _ => "customers".to_string(),
        })
    }

    fn query_params(client: &HelpScoutClient, query: &CustomerQuery) -> QueryParams {
        let params = QueryParams::new()
            .with_opt("firstName", query.first_name.as_deref())
            .with_opt("lastName", query.last_name.as_deref());

        match client.api_version() {
            ApiVersion::V1 => params.with_opt("email", query.email.as_deref()),
            ApiVersion::V2 => params.with_opt("mailbox", query.mailbox_id).with_opt(
                "query",
                query
                    .email
                    .as_deref()
                    .map(|email| urlencoding::encode(&format!("(email:\"{email}\")")).into_owned()),
            ),
        }
    }
}

impl Create for NewCustomer {
    const CREATE_PATH: &'static str = "customers";

    fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(HelpScoutError::validation("Missing Customer: first name is required"));
        }
        Ok(())
    }

    fn create_params(client: &HelpScoutClient) -> Option<QueryParams> {
        // v1 only echoes the created customer when asked to.
        (client.api_version() == ApiVersion::V1).then(|| QueryParams::new().with("reload", true))
    }
}

impl Update for Customer {
    type Params = CustomerUpdateParams;
}

// Convenience functions for working with customers

/// Fetch customers matching the query, up to `limit`.
pub async fn get_customers(
    client: &HelpScoutClient,
    query: CustomerQuery,
    limit: Limit,
) -> Result<Vec<Customer>> {
    Customer::list(client, &query, limit).await
}

/// Fetch customers with conversations in a mailbox, up to `limit`.
pub async fn customers_by_mailbox(
    client: &HelpScoutClient,
    mailbox_id: u64,
    limit: Limit,
) -> Result<Vec<Customer>> {
    let query = CustomerQuery {
        mailbox_id: Some(mailbox_id),
        ..Default::default()
    };
    Customer::list(client, &query, limit).await
}

/// Fetch every customer with the given email address.
pub async fn customers_by_email(client: &HelpScoutClient, email: &str) -> Result<Vec<Customer>> {
    let query = CustomerQuery {
        email: Some(email.to_string()),
        ..Default::default()
    };
    Customer::list(client, &query, Limit::Unlimited).await
}
