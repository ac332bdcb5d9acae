use thiserror::Error;

use crate::blueprint::firstboot::FirstbootError;
use crate::blueprint::iso::IsoError;
use crate::blueprint::policy::PolicyError;
use crate::blueprint::validation::{LayoutError, PartitioningError};

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("cannot read file {1}: {0}")]
    ReadFile(std::io::Error, String),

    #[error("JSON unmarshal: {0}")]
    Json(serde_json::Error),

    #[error("TOML unmarshal: {0}")]
    Toml(toml::de::Error),

    #[error("YAML unmarshal: {0}")]
    Yaml(serde_yaml::Error),

    #[error(transparent)]
    Partitioning(#[from] PartitioningError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Firstboot(#[from] FirstbootError),

    #[error(transparent)]
    Iso(#[from] IsoError),

    #[error("bad cli arguments: {0}")]
    BadArgs(String),
}
