//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HelpScoutClient;
use crate::envelope::ApiVersion;
use crate::error::Result;
use crate::pagination::{Limit, QueryParams};
use crate::traits::{Get, List, Resource};

/// A Help Scout user (an agent on the account).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Role (e.g. "owner", "admin", "user").
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default)]
    pub photo_url: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// First and last name, space separated.
    pub fn full_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

pub(crate) fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Query for listing users.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserQuery {
    /// Restrict to users with access to this mailbox.
    pub mailbox_id: Option<u64>,
}

impl Resource for User {
    const NAME: &'static str = "user";
}

impl Get for User {
    type Id = u64;

    fn item_path(id: &u64) -> String {
        format!("users/{id}")
    }
}

impl List for User {
    type Query = UserQuery;

    fn collection_path(client: &HelpScoutClient, query: &UserQuery) -> Result<String> {
        Ok(match (client.api_version(), query.mailbox_id) {
            (ApiVersion::V1, Some(mailbox)) => format!("mailboxes/{mailbox}/users"),
            _ => "users".to_string(),
        })
    }

    fn query_params(client: &HelpScoutClient, query: &UserQuery) -> QueryParams {
        match client.api_version() {
            ApiVersion::V1 => QueryParams::new(),
            ApiVersion::V2 => QueryParams::new().with_opt("mailbox", query.mailbox_id),
        }
    }
}

/// Fetch all users.
pub async fn get_users(client: &HelpScoutClient) -> Result<Vec<User>> {
    User::list(client, &UserQuery::default(), Limit::Unlimited).await
}

/// Fetch all users with access to a mailbox.
pub async fn users_in_mailbox(client: &HelpScoutClient, mailbox_id: u64) -> Result<Vec<User>> {
    let query = UserQuery {
        mailbox_id: Some(mailbox_id),
    };
    User::list(client, &query, Limit::Unlimited).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(full_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
        assert_eq!(full_name(Some("Ada"), None), "Ada");
        assert_eq!(full_name(None, Some("")), "");
    }

    #[test]
    fn test_mailbox_users_path_differs_by_version() {
        let query = UserQuery {
            mailbox_id: Some(7),
        };

        let v1 = HelpScoutClient::v1("k").unwrap();
        assert_eq!(User::collection_path(&v1, &query).unwrap(), "mailboxes/7/users");
        assert!(User::query_params(&v1, &query).is_empty());

        let v2 = HelpScoutClient::v2("id", "secret").unwrap();
        assert_eq!(User::collection_path(&v2, &query).unwrap(), "users");
        assert_eq!(User::query_params(&v2, &query).get("mailbox"), Some("7"));
    }
}
