//! Basic example listing mailboxes and their folders.
//!
//! Run with:
//! ```
//! HELPSCOUT_API_KEY=your-key cargo run --example basic
//! ```

use helpscout::{folders_in_mailbox, get_mailboxes, HelpScoutClient};

#[tokio::main]
async fn main() -> helpscout::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating Help Scout client...");
    let client = HelpScoutClient::from_env()?;
    println!("Connected to: {} ({:?})", client.base_url(), client.api_version());

    println!("\n--- Listing Mailboxes ---");
    let mailboxes = get_mailboxes(&client).await?;
    println!("Found {} mailboxes", mailboxes.len());

    for mailbox in &mailboxes {
        println!(
            "  - {} ({}) <{}>",
            mailbox.name.as_deref().unwrap_or("unnamed"),
            mailbox.id,
            mailbox.email.as_deref().unwrap_or("no email")
        );
    }

    if let Some(first) = mailboxes.first() {
        println!("\n--- Folders in {} ---", first.id);
        let folders = folders_in_mailbox(&client, first.id).await?;
        for folder in folders.iter().take(10) {
            println!(
                "  - {} [{}]",
                folder.name.as_deref().unwrap_or("unnamed"),
                folder.folder_type.as_deref().unwrap_or("unknown")
            );
        }
    }

    println!("\nDone!");
    Ok(())
}
