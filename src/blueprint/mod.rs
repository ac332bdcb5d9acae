pub mod decode;
pub mod disk;
pub mod firstboot;
pub mod iso;
pub mod policy;
pub mod sshd;
pub mod validation;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::pathpolicy::PathPolicies;
use crate::errors::BlueprintError;

pub use self::disk::*;
pub use self::firstboot::{
    FirstbootCustomization,
    FirstbootScript,
    FirstbootScriptCustomization,
};
pub use self::iso::IsoCustomization;
pub use self::policy::check_disk_mountpoints_policy;
pub use self::sshd::{PermitRootLogin, SshdCustomization};

/// An image blueprint. Only the customizations this crate validates are
/// modelled; other keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blueprint {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Customizations>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customizations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskCustomization>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstboot: Option<FirstbootCustomization>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<IsoCustomization>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sshd: Option<SshdCustomization>,
}

impl Blueprint {
    pub fn from_json(s: &str) -> Result<Self, BlueprintError> {
        serde_json::from_str(s).map_err(BlueprintError::Json)
    }

    pub fn from_toml(s: &str) -> Result<Self, BlueprintError> {
        toml::from_str(s).map_err(BlueprintError::Toml)
    }

    pub fn from_yaml(s: &str) -> Result<Self, BlueprintError> {
        serde_yaml::from_str(s).map_err(BlueprintError::Yaml)
    }

    pub fn disk(&self) -> Option<&DiskCustomization> {
        self.customizations.as_ref()?.disk.as_ref()
    }

    pub fn firstboot(&self) -> Option<&FirstbootCustomization> {
        self.customizations.as_ref()?.firstboot.as_ref()
    }

    pub fn iso(&self) -> Option<&IsoCustomization> {
        self.customizations.as_ref()?.iso.as_ref()
    }

    pub fn sshd(&self) -> Option<&SshdCustomization> {
        self.customizations.as_ref()?.sshd.as_ref()
    }

    /// Runs every check on the blueprint customizations, in order:
    /// disk validation, layout constraints, mountpoint policy, ISO volume id,
    /// firstboot scripts. Returns the selected firstboot scripts.
    pub fn validate(
        &self,
        policies: &PathPolicies,
    ) -> Result<Vec<FirstbootScript>, BlueprintError> {
        if let Some(disk) = self.disk() {
            disk.validate()?;
            disk.validate_layout_constraints()?;
            check_disk_mountpoints_policy(disk, policies)?;

            info!(
                partitions = disk.partitions.len(),
                mountpoints = disk.mountpoints().len(),
                "disk customizations ok"
            );
        }

        if let Some(iso) = self.iso() {
            iso.validate()?;
        }

        let scripts = match self.firstboot() {
            Some(firstboot) => firstboot.validate()?,
            None => Vec::new(),
        };

        Ok(scripts)
    }
}
