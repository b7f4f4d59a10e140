//! Mailbox and folder models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::HelpScoutClient;
use crate::error::Result;
use crate::pagination::Limit;
use crate::traits::{Get, List, Resource};

/// A Help Scout mailbox.
///
/// List endpoints return a reduced form (id and name); fetch a single
/// mailbox for the full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    /// Unique identifier.
    pub id: u64,

    /// Name of the mailbox.
    #[serde(default)]
    pub name: Option<String>,

    /// Key used to represent this mailbox.
    #[serde(default)]
    pub slug: Option<String>,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, alias = "updatedAt")]
    pub modified_at: Option<DateTime<Utc>>,

    /// Folders, when the API includes them.
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// A folder within a mailbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    /// Folder type (e.g. "mytickets", "drafts", "assigned").
    #[serde(rename = "type", default)]
    pub folder_type: Option<String>,

    /// Owner, for user-specific folders.
    #[serde(default)]
    pub user_id: Option<u64>,

    /// Total conversations in the folder.
    #[serde(default)]
    pub total_count: Option<u64>,

    /// Active conversations in the folder.
    #[serde(default)]
    pub active_count: Option<u64>,

    #[serde(default, alias = "updatedAt")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Query for listing folders in a mailbox.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderQuery {
    pub mailbox_id: u64,
}

impl Resource for Mailbox {
    const NAME: &'static str = "mailbox";
}

impl Resource for Folder {
    const NAME: &'static str = "folder";
}

impl Get for Mailbox {
    type Id = u64;

    fn item_path(id: &u64) -> String {
        format!("mailboxes/{id}")
    }
}

impl List for Mailbox {
    type Query = ();

    fn collection_path(_client: &HelpScoutClient, _query: &()) -> Result<String> {
        Ok("mailboxes".to_string())
    }
}

impl List for Folder {
    type Query = FolderQuery;

    fn collection_path(_client: &HelpScoutClient, query: &FolderQuery) -> Result<String> {
        Ok(format!("mailboxes/{}/folders", query.mailbox_id))
    }
}

// Convenience functions for working with mailboxes

/// Fetch all mailboxes.
pub async fn get_mailboxes(client: &HelpScoutClient) -> Result<Vec<Mailbox>> {
    Mailbox::list(client, &(), Limit::Unlimited).await
}

/// Fetch all folders in a mailbox.
pub async fn folders_in_mailbox(client: &HelpScoutClient, mailbox_id: u64) -> Result<Vec<Folder>> {
    Folder::list(client, &FolderQuery { mailbox_id }, Limit::Unlimited).await
}
