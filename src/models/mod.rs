//! Help Scout API model types.

mod conversation;
mod customer;
mod mailbox;
mod rating;
mod user;

pub use conversation::*;
pub use customer::*;
pub use mailbox::*;
pub use rating::*;
pub use user::{get_users, users_in_mailbox, User, UserQuery};

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Move `_embedded.<key>` to a top-level `<key>`, as v2 nests related
/// collections. Items without it are returned unchanged.
pub(crate) fn hoist_embedded(mut item: Value, key: &str) -> Value {
    if let Some(obj) = item.as_object_mut() {
        let embedded = obj
            .get_mut("_embedded")
            .and_then(Value::as_object_mut)
            .and_then(|embedded| embedded.remove(key));
        if let Some(value) = embedded {
            obj.insert(key.to_string(), value);
        }
        if obj
            .get("_embedded")
            .and_then(Value::as_object)
            .is_some_and(|embedded| embedded.is_empty())
        {
            obj.remove("_embedded");
        }
    }
    item
}

/// ISO 8601 in UTC with second precision, as the API expects in filters.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
