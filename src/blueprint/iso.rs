use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ASCII word characters only
static VOLUME_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u)^[\w\d_-]+$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsoError {
    #[error("invalid volume id {0:?}, may contain letters, numbers, -, and _ only")]
    InvalidVolumeId(String),
}

/// ISO 9660 header fields of installer images
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoCustomization {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub application_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub publisher: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume_id: String,
}

impl IsoCustomization {
    /// Checks the volume id, if one is set
    pub fn validate(&self) -> Result<(), IsoError> {
        if self.volume_id.is_empty() {
            return Ok(());
        }

        validate_volume_id(&self.volume_id)
    }
}

pub fn validate_volume_id(volume_id: &str) -> Result<(), IsoError> {
    if !VOLUME_ID_REGEX.is_match(volume_id) {
        return Err(IsoError::InvalidVolumeId(volume_id.to_string()));
    }

    Ok(())
}
