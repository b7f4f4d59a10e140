//! Help Scout API CLI binary.
//!
//! A command-line interface for interacting with the Help Scout API.

use clap::{Parser, ValueEnum};
use helpscout::cli::{Cli, Command, Entity, Filter};
use helpscout::output::PrettyPrint;
use helpscout::{
    Conversation, ConversationQuery, Customer, CustomerQuery, ErrorPolicy, Folder, FolderQuery,
    Get, HelpScoutClient, HelpScoutError, Limit, List, Mailbox, Rating, RatingQuery, User,
    UserQuery,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match HelpScoutClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "Hint: Set HELPSCOUT_API_KEY, or HELPSCOUT_CLIENT_ID and HELPSCOUT_CLIENT_SECRET"
            );
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &HelpScoutClient, cli: Cli) -> helpscout::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, id, cli.json).await,
        Command::List {
            entity,
            filter,
            limit,
            lenient,
        } => {
            let client = if lenient {
                client.with_error_policy(ErrorPolicy::Lenient)
            } else {
                client.clone()
            };
            handle_list(&client, entity, &filter, Limit::from(limit), cli.json).await
        }
        Command::Count { entity, filter } => handle_count(client, entity, &filter).await,
    }
}

async fn handle_get(
    client: &HelpScoutClient,
    entity: Entity,
    id: u64,
    json: bool,
) -> helpscout::Result<()> {
    match entity {
        Entity::Mailbox => output_single(Mailbox::get(client, id).await?, entity, id, json),
        Entity::User => output_single(User::get(client, id).await?, entity, id, json),
        Entity::Customer => output_single(Customer::get(client, id).await?, entity, id, json),
        Entity::Conversation => {
            output_single(Conversation::get(client, id).await?, entity, id, json)
        }
        Entity::Folder | Entity::Rating => {
            let name = entity_name(entity);
            eprintln!("Hint: Use 'helpscout list {name}' instead");
            Err(HelpScoutError::validation(format!(
                "{name} cannot be retrieved individually"
            )))
        }
    }
}

async fn handle_list(
    client: &HelpScoutClient,
    entity: Entity,
    filter: &Filter,
    limit: Limit,
    json: bool,
) -> helpscout::Result<()> {
    match entity {
        Entity::Mailbox => {
            let mailboxes = Mailbox::list(client, &(), limit).await?;
            output_list(&mailboxes, json, |x| MailboxRow::from(x))
        }
        Entity::Folder => {
            let folders = Folder::list(client, &folder_query(filter)?, limit).await?;
            output_list(&folders, json, |x| FolderRow::from(x))
        }
        Entity::User => {
            let users = User::list(client, &user_query(filter), limit).await?;
            output_list(&users, json, |x| UserRow::from(x))
        }
        Entity::Customer => {
            let customers = Customer::list(client, &customer_query(filter), limit).await?;
            output_list(&customers, json, |x| CustomerRow::from(x))
        }
        Entity::Conversation => {
            let conversations =
                Conversation::list(client, &conversation_query(filter), limit).await?;
            output_list(&conversations, json, |x| ConversationRow::from(x))
        }
        Entity::Rating => {
            let ratings = Rating::list(client, &rating_query(filter), limit).await?;
            output_list(&ratings, json, |x| RatingRow::from(x))
        }
    }
}

async fn handle_count(
    client: &HelpScoutClient,
    entity: Entity,
    filter: &Filter,
) -> helpscout::Result<()> {
    let count = match entity {
        Entity::Mailbox => Mailbox::count(client, &()).await?,
        Entity::Folder => Folder::count(client, &folder_query(filter)?).await?,
        Entity::User => User::count(client, &user_query(filter)).await?,
        Entity::Customer => Customer::count(client, &customer_query(filter)).await?,
        Entity::Conversation => {
            Conversation::count(client, &conversation_query(filter)).await?
        }
        Entity::Rating => Rating::count(client, &rating_query(filter)).await?,
    };
    println!("{count}");
    Ok(())
}

fn folder_query(filter: &Filter) -> helpscout::Result<FolderQuery> {
    let mailbox_id = filter
        .mailbox
        .ok_or_else(|| HelpScoutError::validation("--mailbox required for listing folders"))?;
    Ok(FolderQuery { mailbox_id })
}

fn user_query(filter: &Filter) -> UserQuery {
    UserQuery {
        mailbox_id: filter.mailbox,
    }
}

fn customer_query(filter: &Filter) -> CustomerQuery {
    CustomerQuery {
        email: filter.email.clone(),
        mailbox_id: filter.mailbox,
        ..Default::default()
    }
}

fn conversation_query(filter: &Filter) -> ConversationQuery {
    ConversationQuery {
        mailbox_id: filter.mailbox,
        folder_id: filter.folder,
        customer_id: filter.customer,
        status: filter.status,
        modified_since: filter.modified_since,
    }
}

fn rating_query(filter: &Filter) -> RatingQuery {
    RatingQuery {
        start: filter.start,
        end: filter.end,
        rating: filter.rating,
    }
}

fn output_single<T: Serialize + PrettyPrint>(
    item: Option<T>,
    entity: Entity,
    id: u64,
    json: bool,
) -> helpscout::Result<()> {
    let item = item.ok_or_else(|| {
        HelpScoutError::validation(format!("no {} with id {id}", entity_name(entity)))
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> helpscout::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} items", items.len());
    }
    Ok(())
}

fn entity_name(entity: Entity) -> String {
    entity
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}

fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct MailboxRow {
    id: u64,
    name: String,
    email: String,
}

impl From<&Mailbox> for MailboxRow {
    fn from(m: &Mailbox) -> Self {
        Self {
            id: m.id,
            name: or_empty(m.name.as_deref()),
            email: or_empty(m.email.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct FolderRow {
    id: u64,
    name: String,
    #[tabled(rename = "type")]
    folder_type: String,
    active: u64,
    total: u64,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id,
            name: or_empty(f.name.as_deref()),
            folder_type: or_empty(f.folder_type.as_deref()),
            active: f.active_count.unwrap_or_default(),
            total: f.total_count.unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    id: u64,
    name: String,
    email: String,
    role: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.full_name(),
            email: or_empty(u.email.as_deref()),
            role: or_empty(u.role.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct CustomerRow {
    id: u64,
    name: String,
    email: String,
    organization: String,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            name: c.full_name(),
            email: or_empty(c.primary_email()),
            organization: or_empty(c.organization.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct ConversationRow {
    number: String,
    status: String,
    subject: String,
    customer: String,
    modified: String,
}

impl From<&Conversation> for ConversationRow {
    fn from(c: &Conversation) -> Self {
        Self {
            number: c.number.map(|n| format!("#{n}")).unwrap_or_default(),
            status: or_empty(c.status.as_deref()),
            subject: or_empty(c.subject.as_deref()),
            customer: c
                .customer
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            modified: c
                .last_modified()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct RatingRow {
    conversation: String,
    rating: String,
    customer: String,
    user: String,
}

impl From<&Rating> for RatingRow {
    fn from(r: &Rating) -> Self {
        Self {
            conversation: r.number.map(|n| format!("#{n}")).unwrap_or_default(),
            rating: or_empty(r.rating.as_deref()),
            customer: or_empty(r.rating_customer_name.as_deref()),
            user: or_empty(r.rating_user_name.as_deref()),
        }
    }
}
