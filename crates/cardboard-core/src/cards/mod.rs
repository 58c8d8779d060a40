//! Card records and their JSON shapes.

pub mod parse;
pub mod types;

pub use parse::{parse_payload, parse_snapshot};
pub use types::{CardData, DEFAULT_IMAGE_ALT, DEFAULT_IMAGE_URL, ImageData};
