//! Parsers for the static snapshot and endpoint payload formats.
//!
//! Snapshot: a bare JSON array of cards.
//! Endpoint payload: `{ "items": [...] }`; unknown sibling fields are ignored.

use serde::Deserialize;

use crate::cards::types::CardData;

#[derive(Debug, Deserialize)]
struct RawPayload {
    items: Vec<CardData>,
}

/// Parse a static snapshot (`[{"title": ..., "content": ...}, ...]`).
pub fn parse_snapshot(text: &str) -> Result<Vec<CardData>, serde_json::Error> {
    serde_json::from_str(text)
}

/// Parse an endpoint response body.
///
/// A missing `items` key, a non-array `items`, or an item that is not a card
/// is an error.
pub fn parse_payload(body: &str) -> Result<Vec<CardData>, serde_json::Error> {
    serde_json::from_str::<RawPayload>(body).map(|payload| payload.items)
}
