//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, Utc};

use crate::{Conversation, Customer, Mailbox, Rating, Thread, User};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

impl PrettyPrint for Conversation {
    fn pretty_print(&self) -> String {
        let title = match self.number {
            Some(number) => format!("Conversation #{number}"),
            None => format!("Conversation {}", self.id),
        };
        let mut lines = header(title);

        if let Some(ref subject) = self.subject {
            lines.push(format!("Subject:        {subject}"));
        }

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {status}"));
        }

        let assignee = self
            .owner
            .as_ref()
            .filter(|owner| owner.id != 0)
            .map_or_else(|| "unassigned".to_string(), ToString::to_string);
        lines.push(format!("Assigned to:    {assignee}"));

        if let Some(ref customer) = self.customer {
            lines.push(format!("Customer:       {customer}"));
        }

        if let Some(modified) = self.last_modified() {
            lines.push(format!("Last Modified:  {}", timestamp(&modified)));
        }

        if !self.tags.is_empty() {
            lines.push(format!("Tags:           {}", self.tag_names().join(", ")));
        }

        lines.push(format!("URL:            {}", self.web_url()));

        if let Some(ref preview) = self.preview {
            lines.push(String::new());
            lines.push(preview.clone());
        }

        for thread in &self.threads {
            lines.push(String::new());
            lines.push(thread.pretty_print());
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Thread {
    fn pretty_print(&self) -> String {
        let author = self
            .customer
            .as_ref()
            .or(self.created_by.as_ref())
            .map_or_else(|| "unknown".to_string(), ToString::to_string);
        format!("{author}: {}", self.body.as_deref().unwrap_or(""))
    }
}

impl PrettyPrint for Customer {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Customer: {}", self.full_name()));

        for email in &self.emails {
            match email.location {
                Some(ref location) => {
                    lines.push(format!("Email:          {} ({location})", email.value))
                }
                None => lines.push(format!("Email:          {}", email.value)),
            }
        }

        if let Some(ref organization) = self.organization {
            lines.push(format!("Organization:   {organization}"));
        }

        if let Some(ref job_title) = self.job_title {
            lines.push(format!("Job Title:      {job_title}"));
        }

        if let Some(ref modified) = self.modified_at {
            lines.push(format!("Last Modified:  {}", timestamp(modified)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("User: {}", self.full_name()));

        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {email}"));
        }

        if let Some(ref role) = self.role {
            lines.push(format!("Role:           {role}"));
        }

        if let Some(ref timezone) = self.timezone {
            lines.push(format!("Timezone:       {timezone}"));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Mailbox {
    fn pretty_print(&self) -> String {
        let name = self.name.as_deref().unwrap_or("(unnamed)");
        let mut lines = header(format!("Mailbox: {name}"));

        lines.push(format!("ID:             {}", self.id));

        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {email}"));
        }

        if let Some(ref slug) = self.slug {
            lines.push(format!("Slug:           {slug}"));
        }

        for folder in &self.folders {
            lines.push(format!(
                "Folder:         {} ({} active / {} total)",
                folder.name.as_deref().unwrap_or("?"),
                folder.active_count.unwrap_or_default(),
                folder.total_count.unwrap_or_default()
            ));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Rating {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!(
            "Rating: {}",
            self.rating.as_deref().unwrap_or("unknown")
        ));

        if let Some(number) = self.number {
            lines.push(format!("Conversation:   #{number}"));
        }

        if let Some(ref customer) = self.rating_customer_name {
            lines.push(format!("Customer:       {customer}"));
        }

        if let Some(ref user) = self.rating_user_name {
            lines.push(format!("User:           {user}"));
        }

        if let Some(comments) = self.rating_comments.as_ref().filter(|c| !c.is_empty()) {
            lines.push(format!("Comments:       {comments}"));
        }

        lines.join("\n")
    }
}
