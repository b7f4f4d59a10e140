//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the helpscout binary.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::ConversationStatusFilter;

/// Help Scout API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "helpscout", about = "Help Scout API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: u64,
    },

    /// List entities, following pages up to --limit.
    List {
        /// The type of entity to list.
        entity: Entity,

        #[command(flatten)]
        filter: Filter,

        /// Maximum number of items (0 for all).
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Return the items fetched so far if a page request fails.
        #[arg(long)]
        lenient: bool,
    },

    /// Print the server-reported number of entities.
    Count {
        /// The type of entity to count.
        entity: Entity,

        #[command(flatten)]
        filter: Filter,
    },
}

/// Filters shared by `list` and `count`.
#[derive(Args, Debug, Clone, Default)]
pub struct Filter {
    /// Mailbox ID (required for folders, and for conversations on v1).
    #[arg(long)]
    pub mailbox: Option<u64>,

    /// Folder ID (conversations).
    #[arg(long)]
    pub folder: Option<u64>,

    /// Customer ID (conversations).
    #[arg(long)]
    pub customer: Option<u64>,

    /// Conversation status: active, all, pending, closed or spam.
    #[arg(long)]
    pub status: Option<ConversationStatusFilter>,

    /// Only conversations modified since this time (RFC 3339).
    #[arg(long)]
    pub modified_since: Option<DateTime<Utc>>,

    /// Customer email address.
    #[arg(long)]
    pub email: Option<String>,

    /// Report window start (ratings, RFC 3339).
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Report window end (ratings, RFC 3339).
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Rating ID to report on, 0 for all (ratings).
    #[arg(long, default_value_t = 0)]
    pub rating: u8,
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A mailbox.
    #[value(alias = "mailboxes")]
    Mailbox,
    /// A folder within a mailbox.
    #[value(alias = "folders")]
    Folder,
    /// An agent on the account.
    #[value(alias = "users")]
    User,
    /// A customer.
    #[value(alias = "customers")]
    Customer,
    /// A conversation.
    #[value(alias = "conversations")]
    Conversation,
    /// A happiness rating (v1).
    #[value(alias = "ratings")]
    Rating,
}
