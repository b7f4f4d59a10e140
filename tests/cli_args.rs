//! CLI argument parsing tests.

use clap::Parser;
use helpscout::cli::{Cli, Command, Entity};
use helpscout::ConversationStatusFilter;

#[test]
fn test_cli_parses_get_subcommand() {
    let cli = Cli::parse_from(["helpscout", "get", "conversation", "2391938111"]);

    assert!(!cli.json);
    match cli.command {
        Command::Get { entity, id } => {
            assert_eq!(entity, Entity::Conversation);
            assert_eq!(id, 2391938111);
        }
        _ => panic!("Expected Get command"),
    }
}

#[test]
fn test_cli_parses_list_with_filters() {
    let cli = Cli::parse_from([
        "helpscout",
        "list",
        "conversations",
        "--mailbox",
        "85",
        "--status",
        "pending",
        "--limit",
        "120",
        "--lenient",
    ]);

    match cli.command {
        Command::List {
            entity,
            filter,
            limit,
            lenient,
        } => {
            assert_eq!(entity, Entity::Conversation);
            assert_eq!(filter.mailbox, Some(85));
            assert_eq!(filter.status, Some(ConversationStatusFilter::Pending));
            assert_eq!(limit, 120);
            assert!(lenient);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_list_defaults_to_unlimited_strict() {
    let cli = Cli::parse_from(["helpscout", "list", "mailboxes"]);

    match cli.command {
        Command::List {
            entity,
            limit,
            lenient,
            ..
        } => {
            assert_eq!(entity, Entity::Mailbox);
            assert_eq!(limit, 0);
            assert!(!lenient);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_cli_parses_count_subcommand() {
    let cli = Cli::parse_from(["helpscout", "count", "conversation", "--mailbox", "85"]);

    match cli.command {
        Command::Count { entity, filter } => {
            assert_eq!(entity, Entity::Conversation);
            assert_eq!(filter.mailbox, Some(85));
        }
        _ => panic!("Expected Count command"),
    }
}

#[test]
fn test_ratings_window_parses_timestamps() {
    let cli = Cli::parse_from([
        "helpscout",
        "list",
        "ratings",
        "--start",
        "2016-02-25T00:00:00Z",
        "--end",
        "2016-02-29T00:00:00Z",
    ]);

    match cli.command {
        Command::List { entity, filter, .. } => {
            assert_eq!(entity, Entity::Rating);
            assert!(filter.start.is_some());
            assert!(filter.end.is_some());
            assert_eq!(filter.rating, 0);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_global_json_flag() {
    // --json before subcommand
    let cli = Cli::parse_from(["helpscout", "--json", "list", "users"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["helpscout", "list", "users", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_unknown_status_is_rejected() {
    let result = Cli::try_parse_from([
        "helpscout",
        "list",
        "conversations",
        "--status",
        "open",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_lenient_help_describes_partial_results() {
    use clap::CommandFactory;

    let cmd = Cli::command();
    let list = cmd.find_subcommand("list").unwrap();
    let lenient = list
        .get_arguments()
        .find(|arg| arg.get_id() == "lenient")
        .unwrap();
    assert_eq!(
        lenient.get_help().map(ToString::to_string).as_deref(),
        Some("Return the items fetched so far if a page request fails")
    );
}
