//! Common logic to drain the change feeds exposed by Twikey.
//!
//! A feed is a server-side cursor over the changes of a resource (new mandates, paid invoices,
//! ...). Every `GET` returns the next page of changes and moves the cursor forward; the feed is
//! drained once a page without entries is returned. Entries are not de-duplicated, so callbacks
//! are expected to be idempotent.

use crate::{
    common::{API_ERROR_HEADER, RESET_HEADER},
    error::ApiError,
    Error,
};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;

/// Options to configure a single pass over a feed.
///
/// ```rust
/// # use twikey_rust::feed::FeedOptions;
/// # use chrono::{TimeZone, Utc};
/// let options = FeedOptions::new()
///     .reset_to(Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap())
///     .include("collection")
///     .include("lastupdate");
/// ```
#[derive(Clone, Debug, Default)]
pub struct FeedOptions {
    reset_to: Option<DateTime<Utc>>,
    includes: Vec<String>,
}

impl FeedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewinds the server-side cursor to the given instant before reading the first page.
    ///
    /// The rewind is only requested once, at the start of the pass.
    pub fn reset_to(mut self, reset_to: DateTime<Utc>) -> Self {
        self.reset_to = Some(reset_to);
        self
    }

    /// Asks the server to sideload an extra object in every entry.
    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.includes.push(include.into());
        self
    }

    /// Sideloads requested so far.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }
}

/// A single page of a feed.
pub(crate) trait FeedPage: DeserializeOwned {
    type Entry;

    /// Consumes the page, returning its entries in server order.
    fn into_entries(self) -> Vec<Self::Entry>;
}

/// Formats a reset instant the way the `X-RESET` header expects it.
pub(crate) fn format_reset(reset_to: DateTime<Utc>) -> String {
    reset_to.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Requests pages from `url` until an empty one is returned, delivering every entry to `callback`.
///
/// Returns the number of delivered entries.
#[tracing::instrument(name = "Drain feed", skip_all, fields(path = url.path()))]
pub(crate) async fn drain<P, F>(
    client: &ClientWithMiddleware,
    url: Url,
    options: &FeedOptions,
    mut callback: F,
) -> Result<usize, Error>
where
    P: FeedPage,
    F: FnMut(P::Entry),
{
    let includes = options
        .includes
        .iter()
        .map(|include| ("include", include.as_str()))
        .collect::<Vec<_>>();
    let mut reset = options.reset_to.map(format_reset);
    let mut delivered = 0;

    loop {
        let mut request = client.get(url.clone()).query(&includes);
        if let Some(reset) = reset.take() {
            tracing::debug!("Resetting feed to {}", reset);
            request = request.header(RESET_HEADER, reset);
        }

        let response = request.send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(unexpected_status(&response).into());
        }

        // A page without its entry array is a decoding failure, not an empty page
        let page: P = response.json().await?;
        let entries = page.into_entries();
        if entries.is_empty() {
            tracing::debug!("Feed drained, {} entries delivered", delivered);
            return Ok(delivered);
        }

        tracing::debug!("Received a page of {} entries", entries.len());
        for entry in entries {
            callback(entry);
            delivered += 1;
        }
    }
}

/// Feeds only answer with `200 OK`; any other success status is reported as an API error.
fn unexpected_status(response: &reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .headers()
        .get(API_ERROR_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("status={}", status));

    ApiError {
        status,
        message,
        code: None,
        extra: None,
    }
}
