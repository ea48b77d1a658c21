//! Derivative filename stems.
//!
//! Every derivative is named `<prefix><micros>_<hex>`:
//!
//! - `head_1760712345678901_9f3c...` → header image
//! - `img_1760712345678901_04ab...` → body image
//!
//! `micros` is the wall-clock time in microseconds and `hex` is a random v4
//! UUID in simple form. Two calls in the same microsecond still differ in the
//! random part.

use crate::types::ImageRole;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Result of parsing a derivative stem like `img_1760712345678901_04ab...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStem {
    pub role: ImageRole,
    pub micros: u128,
    pub id: String,
}

/// Generate a fresh stem for `role`.
pub fn unique_stem(role: ImageRole) -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or_default();
    format!("{}{}_{}", role.prefix(), micros, Uuid::new_v4().simple())
}

/// Parse a stem produced by [`unique_stem`]. Returns `None` for anything else.
pub fn parse_stem(stem: &str) -> Option<ParsedStem> {
    let (role, rest) = [ImageRole::Header, ImageRole::Body]
        .into_iter()
        .find_map(|role| stem.strip_prefix(role.prefix()).map(|rest| (role, rest)))?;
    let (digits, id) = rest.split_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Some(ParsedStem {
        role,
        micros: digits.parse().ok()?,
        id: id.to_string(),
    })
}
