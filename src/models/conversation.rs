//! Conversation model and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::HelpScoutClient;
use crate::envelope::ApiVersion;
use crate::error::{HelpScoutError, Result};
use crate::models::{format_timestamp, hoist_embedded};
use crate::models::mailbox::Mailbox;
use crate::models::user::full_name;
use crate::pagination::{Limit, QueryParams};
use crate::traits::{Create, Get, List, Resource, Update};

const WEB_APP_URL: &str = "https://secure.helpscout.net";

/// A Help Scout conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u64,

    /// "email", "chat" or "phone".
    #[serde(rename = "type", default)]
    pub conversation_type: Option<String>,

    #[serde(default)]
    pub folder_id: Option<u64>,

    #[serde(default, alias = "draft")]
    pub is_draft: Option<bool>,

    /// Number shown to users in the web app.
    #[serde(default)]
    pub number: Option<u64>,

    /// Assigned user. `None` or id 0 when unassigned.
    #[serde(default, alias = "assignee")]
    pub owner: Option<Person>,

    #[serde(default)]
    pub mailbox: Option<Mailbox>,

    #[serde(default)]
    pub mailbox_id: Option<u64>,

    #[serde(default, alias = "primaryCustomer")]
    pub customer: Option<Person>,

    #[serde(default)]
    pub thread_count: Option<u32>,

    /// "active", "pending", "closed" or "spam".
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub preview: Option<String>,

    #[serde(default)]
    pub created_by: Option<Person>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, alias = "updatedAt")]
    pub modified_at: Option<DateTime<Utc>>,

    /// Last change made by a user (not by a workflow or the system).
    #[serde(default, alias = "userUpdatedAt")]
    pub user_modified_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub closed_by: Option<PersonRef>,

    #[serde(default)]
    pub source: Option<Source>,

    #[serde(default)]
    pub cc: Vec<String>,

    #[serde(default)]
    pub bcc: Vec<String>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub threads: Vec<Thread>,
}

impl Conversation {
    /// Link to the conversation in the Help Scout web app.
    pub fn web_url(&self) -> String {
        format!(
            "{WEB_APP_URL}/conversation/{}/{}/",
            self.id,
            self.number.unwrap_or_default()
        )
    }

    /// When a user last touched the conversation, falling back to any change.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.user_modified_at.or(self.modified_at)
    }

    /// Tag names, whichever API generation produced them.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(Tag::name).collect()
    }
}

/// A single message or note within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: u64,

    #[serde(default)]
    pub assigned_to: Option<Person>,

    /// Conversation status set by this thread ("nochange", "active", ...).
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_by: Option<Person>,

    #[serde(default)]
    pub source: Option<Source>,

    /// Set when the conversation was moved from another mailbox.
    #[serde(default)]
    pub from_mailbox: Option<Mailbox>,

    /// "lineitem", "note", "message", "chat", "customer", "forwardparent",
    /// "forwardchild" or "phone".
    #[serde(rename = "type", default)]
    pub thread_type: Option<String>,

    /// "published", "draft", "underreview" or "hidden".
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub customer: Option<Person>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub to: Vec<String>,

    #[serde(default)]
    pub cc: Vec<String>,

    #[serde(default)]
    pub bcc: Vec<String>,

    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A customer or user referenced from a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    /// "user" or "customer".
    #[serde(rename = "type", default)]
    pub person_type: Option<String>,
}

impl Person {
    /// First and last name, space separated.
    pub fn full_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.full_name();
        match (&name[..], self.email.as_deref()) {
            ("", Some(email)) => f.write_str(email),
            ("", None) => write!(f, "#{}", self.id),
            (name, _) => f.write_str(name),
        }
    }
}

/// v1 embeds the full person; v2 gives only the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonRef {
    Id(u64),
    Person(Person),
}

impl PersonRef {
    pub fn id(&self) -> u64 {
        match self {
            Self::Id(id) => *id,
            Self::Person(person) => person.id,
        }
    }
}

/// Where a conversation or thread originated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Source {
    /// "email", "web", "notification", "emailfwd", "api" or "chat".
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,

    /// "customer" or "user".
    #[serde(default)]
    pub via: Option<String>,
}

/// File attached to a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: u64,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,

    /// Image width in pixels.
    #[serde(default)]
    pub width: Option<u32>,

    /// Image height in pixels.
    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Base64-encoded attachment content (v1 only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentData {
    #[serde(default)]
    pub id: Option<u64>,

    pub data: String,
}

/// Conversation tag: a bare name on v1, an object on v2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Name(String),
    Detailed {
        #[serde(default)]
        id: Option<u64>,
        tag: String,
        #[serde(default)]
        color: Option<String>,
    },
}

impl Tag {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed { tag, .. } => tag,
        }
    }
}

/// Status filter for conversation listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationStatusFilter {
    Active,
    #[default]
    All,
    Pending,
    Closed,
    Spam,
}

impl ConversationStatusFilter {
    /// Value sent as the `status` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::All => "all",
            Self::Pending => "pending",
            Self::Closed => "closed",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for ConversationStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationStatusFilter {
    type Err = HelpScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "closed" => Ok(Self::Closed),
            "spam" => Ok(Self::Spam),
            other => Err(HelpScoutError::validation(format!(
                "unknown conversation status: {other}"
            ))),
        }
    }
}

/// Query parameters for listing conversations.
///
/// v1 requires `mailbox_id`; `folder_id` and `customer_id` narrow the
/// listing further (folder wins if both are set).
#[derive(Debug, Clone, Default)]
pub struct ConversationQuery {
    pub mailbox_id: Option<u64>,
    pub folder_id: Option<u64>,
    pub customer_id: Option<u64>,
    pub status: Option<ConversationStatusFilter>,
    pub modified_since: Option<DateTime<Utc>>,
}

impl ConversationQuery {
    /// Conversations in a mailbox.
    pub fn in_mailbox(mailbox_id: u64) -> Self {
        Self {
            mailbox_id: Some(mailbox_id),
            ..Default::default()
        }
    }
}

/// A conversation to be created, with its opening customer message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversation {
    pub mailbox_id: u64,
    pub subject: String,
    pub customer_email: String,
    /// Text of the first thread.
    pub body: String,
    /// Defaults to "email".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<String>,
    /// Defaults to "active".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Create without sending outgoing emails or notifications.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub imported: bool,
}

/// Parameters for replacing a conversation's editable fields (PUT).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Assign to this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Person>,

    /// Move to this mailbox.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailbox_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// One change in a v2 conversation patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// "replace", "move" or "remove".
    pub op: String,
    /// Field being changed, e.g. "/subject".
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    /// Replace a field's value.
    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: "replace".to_string(),
            path: path.into(),
            value: Some(value.into()),
        }
    }

    /// Remove a field.
    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: "remove".to_string(),
            path: path.into(),
            value: None,
        }
    }
}

impl Resource for Conversation {
    const NAME: &'static str = "conversation";

    fn from_item(item: Value) -> Result<Self> {
        let mut item = item;
        // v2 reports the thread count under `threads`; the threads themselves
        // arrive in `_embedded`.
        if let Some(obj) = item.as_object_mut() {
            if let Some(count) = obj.get("threads").and_then(Value::as_u64) {
                obj.remove("threads");
                obj.entry("threadCount").or_insert(json!(count));
            }
        }

        let mut item = hoist_embedded(item, "threads");
        if let Some(Value::Array(threads)) = item.get_mut("threads") {
            for thread in threads.iter_mut() {
                *thread = hoist_embedded(thread.take(), "attachments");
            }
        }

        Ok(serde_json::from_value(item)?)
    }
}

impl Resource for AttachmentData {
    const NAME: &'static str = "attachment data";
}

impl Resource for NewConversation {
    const NAME: &'static str = "conversation";
}

impl Get for Conversation {
    type Id = u64;

    fn item_path(id: &u64) -> String {
        format!("conversations/{id}")
    }
}

impl Get for AttachmentData {
    type Id = u64;

    fn item_path(id: &u64) -> String {
        format!("attachments/{id}/data")
    }
}

impl List for Conversation {
    type Query = ConversationQuery;

    fn collection_path(client: &HelpScoutClient, query: &ConversationQuery) -> Result<String> {
        if client.api_version() == ApiVersion::V2 {
            return Ok("conversations".to_string());
        }

        let mailbox = query.mailbox_id.ok_or_else(|| {
            HelpScoutError::validation("a mailbox id is required to list conversations")
        })?;

        Ok(match (query.folder_id, query.customer_id) {
            (Some(folder), _) => format!("mailboxes/{mailbox}/folders/{folder}/conversations"),
            (None, Some(customer)) => {
                format!("mailboxes/{mailbox}/customers/{customer}/conversations")
            }
            (None, None) => format!("mailboxes/{mailbox}/conversations"),
        })
    }

    fn query_params(client: &HelpScoutClient, query: &ConversationQuery) -> QueryParams {
        let params = QueryParams::new()
            .with_opt("status", query.status)
            .with_opt("modifiedSince", query.modified_since.map(format_timestamp));

        match client.api_version() {
            ApiVersion::V1 => params,
            ApiVersion::V2 => params
                .with_opt("mailbox", query.mailbox_id)
                .with_opt("folder", query.folder_id)
                .with_opt(
                    "query",
                    query
                        .customer_id
                        .map(|id| urlencoding::encode(&format!("(customerIds:{id})")).into_owned()),
                ),
        }
    }
}

impl Create for NewConversation {
    const CREATE_PATH: &'static str = "conversations";

    fn validate(&self) -> Result<()> {
        let missing = if self.mailbox_id == 0 {
            Some("mailbox")
        } else if self.subject.trim().is_empty() {
            Some("subject")
        } else if self.customer_email.trim().is_empty() {
            Some("customer email")
        } else if self.body.trim().is_empty() {
            Some("body")
        } else {
            None
        };

        match missing {
            Some(field) => Err(HelpScoutError::validation(format!(
                "Missing Conversation: {field} is required"
            ))),
            None => Ok(()),
        }
    }

    fn create_params(client: &HelpScoutClient) -> Option<QueryParams> {
        (client.api_version() == ApiVersion::V1).then(|| QueryParams::new().with("reload", true))
    }

    fn create_body(&self, version: ApiVersion) -> Result<Value> {
        let conversation_type = self.conversation_type.as_deref().unwrap_or("email");
        let status = self.status.as_deref().unwrap_or("active");

        Ok(match version {
            ApiVersion::V1 => json!({
                "type": conversation_type,
                "subject": self.subject,
                "status": status,
                "mailbox": {"id": self.mailbox_id},
                "customer": {"email": self.customer_email},
                "tags": self.tags,
                "imported": self.imported,
                "threads": [{
                    "type": "customer",
                    "createdBy": {"email": self.customer_email, "type": "customer"},
                    "body": self.body,
                }],
            }),
            ApiVersion::V2 => json!({
                "type": conversation_type,
                "subject": self.subject,
                "status": status,
                "mailboxId": self.mailbox_id,
                "customer": {"email": self.customer_email},
                "tags": self.tags,
                "imported": self.imported,
                "threads": [{
                    "type": "customer",
                    "customer": {"email": self.customer_email},
                    "text": self.body,
                }],
            }),
        })
    }
}

impl Update for Conversation {
    type Params = ConversationUpdateParams;
}

impl Conversation {
    /// Apply patch operations to a conversation (v2).
    ///
    /// # Errors
    ///
    /// Returns a validation error on v1 clients or for an empty patch, and a
    /// classified error if the API rejects the change.
    pub async fn patch(
        client: &HelpScoutClient,
        id: u64,
        operations: &[PatchOperation],
    ) -> Result<bool> {
        if client.api_version() != ApiVersion::V2 {
            return Err(HelpScoutError::validation(
                "conversation patches require the v2 API",
            ));
        }
        if operations.is_empty() {
            return Err(HelpScoutError::validation("patch has no operations"));
        }

        let path = client.path(&Self::item_path(&id));
        tracing::debug!(entity = Self::NAME, id, ops = operations.len(), "patch");

        // The API takes one operation per request.
        for operation in operations {
            client.patch_one(&path, operation).await?;
        }
        Ok(true)
    }
}

// Convenience functions for working with conversations

/// Fetch conversations in a mailbox, up to `limit`.
pub async fn conversations(
    client: &HelpScoutClient,
    mailbox_id: u64,
    status: Option<ConversationStatusFilter>,
    modified_since: Option<DateTime<Utc>>,
    limit: Limit,
) -> Result<Vec<Conversation>> {
    let query = ConversationQuery {
        status,
        modified_since,
        ..ConversationQuery::in_mailbox(mailbox_id)
    };
    Conversation::list(client, &query, limit).await
}

/// Fetch conversations in a folder, up to `limit`.
pub async fn conversations_in_folder(
    client: &HelpScoutClient,
    mailbox_id: u64,
    folder_id: u64,
    status: Option<ConversationStatusFilter>,
    modified_since: Option<DateTime<Utc>>,
    limit: Limit,
) -> Result<Vec<Conversation>> {
    let query = ConversationQuery {
        folder_id: Some(folder_id),
        status,
        modified_since,
        ..ConversationQuery::in_mailbox(mailbox_id)
    };
    Conversation::list(client, &query, limit).await
}

/// Fetch a customer's conversations in a mailbox, up to `limit`.
pub async fn conversations_by_customer(
    client: &HelpScoutClient,
    mailbox_id: u64,
    customer_id: u64,
    status: Option<ConversationStatusFilter>,
    modified_since: Option<DateTime<Utc>>,
    limit: Limit,
) -> Result<Vec<Conversation>> {
    let query = ConversationQuery {
        customer_id: Some(customer_id),
        status,
        modified_since,
        ..ConversationQuery::in_mailbox(mailbox_id)
    };
    Conversation::list(client, &query, limit).await
}

/// Number of conversations in a mailbox matching the filters.
pub async fn conversation_count(
    client: &HelpScoutClient,
    mailbox_id: u64,
    status: Option<ConversationStatusFilter>,
    modified_since: Option<DateTime<Utc>>,
) -> Result<u64> {
    let query = ConversationQuery {
        status,
        modified_since,
        ..ConversationQuery::in_mailbox(mailbox_id)
    };
    Conversation::count(client, &query).await
}

/// Fetch the content of an attachment (v1).
pub async fn attachment_data(
    client: &HelpScoutClient,
    attachment_id: u64,
) -> Result<Option<AttachmentData>> {
    AttachmentData::get(client, attachment_id).await
}
