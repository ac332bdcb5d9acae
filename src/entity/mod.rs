pub mod pathpolicy;

use humanize_rs::bytes;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("cannot be negative")]
    Negative,

    #[error("bad byte unit string {0}: {1}")]
    BadUnit(String, String),

    #[error("expected an integer or a size string, got {0}")]
    NotSize(String),

    #[error("{0} bytes is too large (max {})", MAX_SIZE)]
    TooLarge(u64),
}

/// Largest size in bytes, TOML integers are signed 64-bit
pub const MAX_SIZE: u64 = i64::MAX as u64;

fn check_max(size: u64) -> Result<u64, SizeError> {
    if size > MAX_SIZE {
        return Err(SizeError::TooLarge(size));
    }

    Ok(size)
}

/// Parses a size string like `"10 GiB"`, `"500M"` or `"1234"` into bytes.
/// Bare digits are bytes, anything else goes through humanize-rs.
pub fn parse_human_bytes(s: &str) -> Result<u64, SizeError> {
    let trimmed = s.trim();
    if trimmed.starts_with('-') {
        return Err(SizeError::Negative);
    }

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed
            .parse::<u64>()
            .map_err(|err| SizeError::BadUnit(s.to_string(), err.to_string()))
            .and_then(check_max);
    }

    trimmed
        .to_lowercase()
        .parse::<bytes::Bytes>()
        .map(|b| b.size() as u64)
        .map_err(|err| SizeError::BadUnit(s.to_string(), err.to_string()))
        .and_then(check_max)
}

/// Accepts either a JSON/TOML integer (bytes) or a size string
pub fn size_from_value(value: &Value) -> Result<u64, SizeError> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return check_max(u);
            }

            match n.as_i64() {
                Some(_) => Err(SizeError::Negative),
                None => Err(SizeError::NotSize(n.to_string())),
            }
        }
        Value::String(s) => parse_human_bytes(s),
        other => Err(SizeError::NotSize(other.to_string())),
    }
}

/// serde `deserialize_with` helper for size fields
pub fn deserialize_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    size_from_value(&value).map_err(serde::de::Error::custom)
}

pub(crate) fn is_zero(n: &u64) -> bool {
    *n == 0
}
