//! HTTP transport for the vehicle-position ingestion endpoint and the
//! aggregated feed endpoint.
//!
//! Requests go through the [`HttpClient`] trait so the success and failure
//! paths can be exercised against stub responses in tests. All failures are
//! terminal for the affected request: no retries, library-default timeouts.

mod client;

pub use client::{BasicClient, HttpClient};

use anyhow::Result;
use prost::Message;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use tracing::debug;

use crate::gtfs_rt::{FeedEntity, FeedMessage};
use crate::parser::parse_feed;
use crate::textfmt;
use crate::topic::{feed_url, vp_post_url};

pub const PROTOBUF_MIME: &str = "application/x-protobuf";
pub const TEXT_MIME: &str = "text/plain";

/// Wire encoding for request and response bodies. Binary protobuf is what
/// production consumers speak; the text format exists for debugging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Binary,
    Text,
}

impl Encoding {
    pub fn mime(self) -> &'static str {
        match self {
            Encoding::Binary => PROTOBUF_MIME,
            Encoding::Text => TEXT_MIME,
        }
    }
}

/// Result of posting one entity: HTTP status plus the response body, kept
/// for error reporting.
#[derive(Debug)]
pub struct PostOutcome {
    pub status: u16,
    pub body: String,
}

impl PostOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Aggregated feed as returned by the server, decoded per the requested
/// encoding.
#[derive(Debug)]
pub enum FetchedFeed {
    Binary(FeedMessage),
    Text(String),
}

/// Serializes `entity` and POSTs it to `{base_url}/vp/f/{feed_id}/a/{agency_id}`.
///
/// Non-2xx statuses are not errors here; they come back in the
/// [`PostOutcome`] so the caller can report status and body. Network
/// failures propagate as errors.
pub async fn post_entity<C: HttpClient>(
    client: &C,
    base_url: &str,
    feed_id: &str,
    agency_id: &str,
    entity: &FeedEntity,
    encoding: Encoding,
) -> Result<PostOutcome> {
    let url = vp_post_url(base_url, feed_id, agency_id);

    let body: Vec<u8> = match encoding {
        Encoding::Binary => entity.encode_to_vec(),
        Encoding::Text => textfmt::entity_to_text(entity).into_bytes(),
    };
    debug!(url = %url, bytes = body.len(), encoding = ?encoding, "Posting FeedEntity");

    let mut req = reqwest::Request::new(Method::POST, url.parse()?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(encoding.mime()));
    *req.body_mut() = Some(body.into());

    let resp = client.execute(req).await?;
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();

    Ok(PostOutcome { status, body })
}

/// GETs `{base_url}/gtfs-rt/feed.pb` with an `Accept` header matching the
/// requested encoding and decodes the response.
///
/// # Errors
///
/// Fails on network errors, non-2xx statuses, and binary bodies that do not
/// decode as a `FeedMessage`.
pub async fn fetch_feed<C: HttpClient>(
    client: &C,
    base_url: &str,
    encoding: Encoding,
) -> Result<FetchedFeed> {
    let url = feed_url(base_url);
    debug!(url = %url, encoding = ?encoding, "Fetching aggregated feed");

    let mut req = reqwest::Request::new(Method::GET, url.parse()?);
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static(encoding.mime()));

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("feed request failed with status {status}: {body}");
    }

    match encoding {
        Encoding::Binary => {
            let bytes = resp.bytes().await?;
            debug!(bytes = bytes.len(), "Feed bytes received, parsing");
            Ok(FetchedFeed::Binary(parse_feed(&bytes)?))
        }
        Encoding::Text => Ok(FetchedFeed::Text(resp.text().await?)),
    }
}
