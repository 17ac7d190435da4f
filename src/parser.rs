//! Protobuf decoding for GTFS Realtime payloads.

use anyhow::Result;
use prost::Message;

use crate::gtfs_rt::{FeedEntity, FeedMessage};

/// Decodes a protobuf-encoded GTFS-RT [`FeedMessage`] from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid protobuf for a `FeedMessage`.
pub fn parse_feed(bytes: &[u8]) -> Result<FeedMessage> {
    Ok(FeedMessage::decode(bytes)?)
}

/// Decodes a single protobuf-encoded [`FeedEntity`] from raw bytes.
pub fn parse_entity(bytes: &[u8]) -> Result<FeedEntity> {
    Ok(FeedEntity::decode(bytes)?)
}
