//! Pagination utilities for Help Scout API responses.
//!
//! Collections are served in 1-based pages. [`collect_pages`] walks them in
//! order until the API returns an empty page or the caller's [`Limit`] is
//! reached.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 10_000;

/// A page of results from the Help Scout API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed).
    pub page: u32,
    /// Total number of pages reported by the server.
    pub total_pages: u32,
    /// Total number of items across all pages reported by the server.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Create a new page from items and pagination info.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, total_pages: u32, total_count: u64) -> Self {
        Self {
            items,
            page,
            total_pages,
            total_count,
        }
    }

    /// Whether the server reports pages after this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_count: self.total_count,
        }
    }

    /// Map the items with a fallible function, stopping at the first error.
    pub fn try_map<U, F: FnMut(T) -> Result<U>>(self, f: F) -> Result<Page<U>> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_>>()?,
            page: self.page,
            total_pages: self.total_pages,
            total_count: self.total_count,
        })
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Ordered `key=value` query parameters.
///
/// Values are written to the URL as given; callers pass values that are
/// already safe to put in a query string (see [`urlencoding::encode`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style [`set`](Self::set) that skips `None`.
    #[must_use]
    pub fn with_opt<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    /// Set a parameter, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Look up a parameter value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The query string without a leading `?`, or `None` when empty.
    #[must_use]
    pub fn query_string(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }
        Some(
            self.pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&"),
        )
    }
}

impl fmt::Display for QueryParams {
    /// Formats as `?a=1&b=2`, or nothing when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.query_string() {
            Some(q) => write!(f, "?{q}"),
            None => Ok(()),
        }
    }
}

/// Upper bound on the number of items a paginated call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Limit {
    /// Fetch every page.
    #[default]
    Unlimited,
    /// Stop once this many items have been collected.
    AtMost(usize),
}

impl Limit {
    /// Interpret a signed count: zero or negative means unlimited.
    #[must_use]
    pub fn from_count(count: i64) -> Self {
        usize::try_from(count)
            .ok()
            .filter(|&n| n > 0)
            .map_or(Self::Unlimited, Self::AtMost)
    }

    fn is_reached(self, collected: usize) -> bool {
        matches!(self, Self::AtMost(n) if collected >= n)
    }
}

impl From<usize> for Limit {
    fn from(count: usize) -> Self {
        if count == 0 {
            Self::Unlimited
        } else {
            Self::AtMost(count)
        }
    }
}

/// What to do when a page fetch fails part way through a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Propagate the error and discard items collected so far.
    #[default]
    Strict,
    /// Log the error and return the items collected so far.
    Lenient,
}

/// Source of collection pages.
///
/// Implemented by [`HelpScoutClient`](crate::HelpScoutClient); the
/// pagination loop only depends on this trait.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page of `path` with the given parameters.
    async fn fetch_page(&self, path: &str, params: &QueryParams) -> Result<Page<Value>>;
}

/// Per-call pagination state.
struct PaginationState {
    page: u32,
    items: Vec<Value>,
    limit: Limit,
}

impl PaginationState {
    fn new(limit: Limit) -> Self {
        Self {
            page: 1,
            items: Vec::new(),
            limit,
        }
    }

    /// Absorb a fetched page; returns true if another page should be fetched.
    fn absorb(&mut self, page: Page<Value>) -> bool {
        if page.is_empty() {
            return false;
        }
        self.items.extend(page.items);
        !self.limit.is_reached(self.items.len())
    }

    fn finish(mut self) -> Vec<Value> {
        if let Limit::AtMost(n) = self.limit {
            self.items.truncate(n);
        }
        self.items
    }
}

/// Fetch every page of a collection, in order.
///
/// Starting at page 1, the `page` parameter is set (overriding any value in
/// `params`) and each page's items are appended. Pagination stops on the
/// first empty page, or once `limit` items have been collected; the result
/// is then truncated to exactly `limit` items.
///
/// # Errors
///
/// Under [`ErrorPolicy::Strict`] the first failing page fetch is returned.
/// Under [`ErrorPolicy::Lenient`] it is logged and the partial result is
/// returned instead.
#[tracing::instrument(skip(fetcher, params))]
pub async fn collect_pages<F>(
    fetcher: &F,
    path: &str,
    params: &QueryParams,
    limit: Limit,
    policy: ErrorPolicy,
) -> Result<Vec<Value>>
where
    F: PageFetcher + ?Sized,
{
    let mut params = params.clone();
    let mut state = PaginationState::new(limit);

    loop {
        params.set("page", state.page);

        match fetcher.fetch_page(path, &params).await {
            Ok(page) => {
                tracing::debug!(page = state.page, items = page.len(), "fetched page");
                if !state.absorb(page) {
                    break;
                }
            }
            Err(e) => match policy {
                ErrorPolicy::Strict => return Err(e),
                ErrorPolicy::Lenient => {
                    tracing::warn!(
                        page = state.page,
                        collected = state.items.len(),
                        error = %e,
                        "page fetch failed, returning partial results"
                    );
                    break;
                }
            },
        }

        state.page += 1;

        // Safety limit to prevent infinite loops
        if state.page > MAX_PAGES {
            tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
            break;
        }
    }

    Ok(state.finish())
}
