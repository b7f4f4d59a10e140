//! Response envelope decoding.
//!
//! Every Help Scout response is one of three envelopes: a single item, a
//! page of a collection, or an error. The two API generations wrap these
//! differently, so decoding is driven by [`ApiVersion`], chosen once when
//! the client is built.

use serde_json::{Map, Value};

use crate::error::{HelpScoutError, Result};
use crate::pagination::Page;

/// Help Scout API generation.
///
/// Selects the base URL, the resource path convention and the envelope
/// shapes the decoder expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Legacy API: Basic auth, `{"item": ..}` / `{"page", "pages", "count", "items"}`.
    V1,
    /// Current API: OAuth2, bare items / `{"page": {..}, "_embedded": {..}}`.
    V2,
}

impl ApiVersion {
    /// Default base URL for this API generation.
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::V1 => "https://api.helpscout.net/v1/",
            Self::V2 => "https://api.helpscout.net/v2/",
        }
    }

    /// Build a resource path relative to the base URL.
    ///
    /// v1 endpoints carry a `.json` suffix, v2 endpoints do not.
    ///
    /// ```
    /// use helpscout::ApiVersion;
    ///
    /// assert_eq!(ApiVersion::V1.resource_path("mailboxes/7/folders"), "mailboxes/7/folders.json");
    /// assert_eq!(ApiVersion::V2.resource_path("mailboxes/7/folders"), "mailboxes/7/folders");
    /// ```
    #[must_use]
    pub fn resource_path(self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match self {
            Self::V1 => format!("{path}.json"),
            Self::V2 => path.to_string(),
        }
    }

    /// Decode a raw response into an [`Envelope`].
    ///
    /// - `200..300`: a [`Envelope::SingleItem`] or [`Envelope::Collection`],
    ///   depending on the body shape.
    /// - `400..500`: an [`Envelope::Error`]. Never fails, even for bodies that
    ///   are not JSON.
    /// - anything else: [`HelpScoutError::Server`].
    ///
    /// Decoding is pure; the same input always yields an equal envelope.
    ///
    /// # Errors
    ///
    /// Returns an error for non-2xx/4xx statuses, or a 2xx body that is not JSON.
    pub fn decode(self, status: u16, body: &[u8]) -> Result<Envelope> {
        match status {
            200..=299 => {
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Envelope::SingleItem { item: None });
                }
                let value: Value = serde_json::from_slice(body)?;
                Ok(match self {
                    Self::V1 => decode_v1(value),
                    Self::V2 => decode_v2(value),
                })
            }
            400..=499 => Ok(Envelope::Error(decode_error(status, body))),
            _ => Err(HelpScoutError::Server { status }),
        }
    }
}

/// One decoded response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A single resource, or nothing.
    SingleItem { item: Option<Value> },
    /// One page of a collection.
    Collection(Page<Value>),
    /// A 4xx response.
    Error(ErrorEnvelope),
}

impl Envelope {
    /// Unwrap a single item, failing on any other variant.
    pub fn into_item(self) -> Result<Option<Value>> {
        match self {
            Self::SingleItem { item } => Ok(item),
            Self::Collection(_) => Err(HelpScoutError::decode(
                "expected a single item, got a collection",
            )),
            Self::Error(e) => Err(e.into_error()),
        }
    }

    /// Unwrap a collection page, failing on any other variant.
    pub fn into_page(self) -> Result<Page<Value>> {
        match self {
            Self::Collection(page) => Ok(page),
            Self::SingleItem { .. } => Err(HelpScoutError::decode(
                "expected a collection, got a single item",
            )),
            Self::Error(e) => Err(e.into_error()),
        }
    }
}

/// Error envelope returned for 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// HTTP status code.
    pub status: u16,
    /// Vendor message (`message`, falling back to `error`).
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Classify this envelope as a typed error.
    #[must_use]
    pub fn into_error(self) -> HelpScoutError {
        match self.status {
            401 | 403 => HelpScoutError::Authentication {
                status: Some(self.status),
                message: self.message.unwrap_or_default(),
            },
            status => HelpScoutError::Client {
                status,
                message: self.message,
            },
        }
    }
}

fn decode_v1(value: Value) -> Envelope {
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Envelope::SingleItem {
                item: non_null(other),
            }
        }
    };

    if let Some(item) = obj.remove("item") {
        return Envelope::SingleItem {
            item: non_null(item),
        };
    }

    // Reports put their records under "results".
    let items = obj.remove("items").or_else(|| obj.remove("results"));
    if items.is_some() || obj.contains_key("pages") {
        return Envelope::Collection(Page::new(
            into_items(items),
            read_u32(&obj, "page").unwrap_or(1),
            read_u32(&obj, "pages").unwrap_or(0),
            read_u64(&obj, "count").unwrap_or(0),
        ));
    }

    Envelope::SingleItem { item: None }
}

fn decode_v2(value: Value) -> Envelope {
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Envelope::SingleItem {
                item: non_null(other),
            }
        }
    };

    let meta = obj.get("page").and_then(Value::as_object).map(|page| {
        (
            read_u32(page, "number").unwrap_or(1),
            read_u32(page, "totalPages").unwrap_or(0),
            read_u64(page, "totalElements").unwrap_or(0),
        )
    });
    let Some((number, total_pages, total_count)) = meta else {
        return Envelope::SingleItem {
            item: Some(Value::Object(obj)),
        };
    };

    // Only one resource type is embedded per collection; take the first in
    // document order.
    let items = match obj.remove("_embedded") {
        Some(Value::Object(embedded)) => embedded.into_iter().next().map(|(_, v)| v),
        _ => None,
    };

    Envelope::Collection(Page::new(into_items(items), number, total_pages, total_count))
}

fn decode_error(status: u16, body: &[u8]) -> ErrorEnvelope {
    let message = serde_json::from_slice::<Value>(body).ok().and_then(|json| {
        ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
    });
    ErrorEnvelope { status, message }
}

fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

fn into_items(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn read_u64(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    obj.get(key).and_then(Value::as_u64)
}

fn read_u32(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    read_u64(obj, key).and_then(|n| u32::try_from(n).ok())
}
