//! Help Scout API client library.
//!
//! A Rust library for the Help Scout helpdesk REST API. It speaks both API
//! generations: v1 (API key over HTTP Basic auth, `.json` paths, enveloped
//! responses) and v2 (OAuth2 client credentials, HAL-style responses).
//! Operations (Get, List, Create, Update) are traits that entity types
//! implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use helpscout::{Conversation, ConversationQuery, HelpScoutClient, Limit, List, Mailbox};
//!
//! #[tokio::main]
//! async fn main() -> helpscout::Result<()> {
//!     // Create client from environment variables
//!     let client = HelpScoutClient::from_env()?;
//!
//!     // List all mailboxes
//!     let mailboxes = helpscout::get_mailboxes(&client).await?;
//!     println!("Found {} mailboxes", mailboxes.len());
//!
//!     // Up to 50 conversations from the first mailbox
//!     if let Some(mailbox) = mailboxes.first() {
//!         let query = ConversationQuery::in_mailbox(mailbox.id);
//!         let conversations = Conversation::list(&client, &query, Limit::AtMost(50)).await?;
//!         for c in &conversations {
//!             println!("{} {}", c.web_url(), c.subject.as_deref().unwrap_or(""));
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`HelpScoutClient`] is the request engine: it authenticates, builds
//!   URLs, decodes the response [`Envelope`] and classifies failures into
//!   [`HelpScoutError`].
//! - [`collect_pages`] walks paginated collections for any [`PageFetcher`].
//! - [`Get`], [`List`], [`Create`] and [`Update`] are implemented by the
//!   model types ([`Mailbox`], [`Conversation`], [`Customer`], ...).
//!
//! # Configuration
//!
//! [`HelpScoutClient::from_env`] reads:
//!
//! - `HELPSCOUT_API_KEY` - v1 API key, or
//! - `HELPSCOUT_CLIENT_ID` and `HELPSCOUT_CLIENT_SECRET` - v2 application credentials
//! - `HELPSCOUT_API_URL` (optional) - base URL override

pub mod auth;
pub mod cli;
mod client;
mod envelope;
mod error;
mod models;
pub mod output;
mod pagination;
mod traits;

// Re-export core types
pub use auth::{AuthMaterial, AuthToken, Authenticator, Clock, Credentials};
pub use client::{ClientBuilder, Created, HelpScoutClient};
pub use envelope::{ApiVersion, Envelope, ErrorEnvelope};
pub use error::{HelpScoutError, Result};
pub use pagination::{collect_pages, ErrorPolicy, Limit, Page, PageFetcher, QueryParams};

// Re-export traits
pub use traits::{Create, Get, List, Resource, Update};

// Re-export models
pub use models::{
    // Mailbox types
    Folder,
    FolderQuery,
    Mailbox,
    // User types
    User,
    UserQuery,
    // Customer types
    Customer,
    CustomerEmail,
    CustomerQuery,
    CustomerUpdateParams,
    NewCustomer,
    // Conversation types
    Attachment,
    AttachmentData,
    Conversation,
    ConversationQuery,
    ConversationStatusFilter,
    ConversationUpdateParams,
    NewConversation,
    PatchOperation,
    Person,
    PersonRef,
    Source,
    Tag,
    Thread,
    // Rating types
    rating_label,
    Rating,
    RatingQuery,
};

// Re-export convenience functions
pub use models::{folders_in_mailbox, get_mailboxes};
pub use models::{get_users, users_in_mailbox};
pub use models::{customers_by_email, customers_by_mailbox, get_customers};
pub use models::{
    attachment_data, conversation_count, conversations, conversations_by_customer,
    conversations_in_folder,
};
pub use models::get_ratings;
