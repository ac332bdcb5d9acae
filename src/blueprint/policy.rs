use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use super::disk::DiskCustomization;
use crate::constants::POLICY_BANNER;
use crate::entity::pathpolicy::{PathPolicies, PathViolation};

/// A mountpoint rejected by the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyViolation {
    pub path: String,
    pub violation: PathViolation,
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path {:?} {}", self.path, self.violation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}\n{}", POLICY_BANNER, join_lines(.violations))]
pub struct PolicyError {
    pub violations: Vec<PolicyViolation>,
}

fn join_lines(violations: &[PolicyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks every mountpoint declared on `disk` (partitions, btrfs subvolumes
/// and logical volumes) against `policies`, collecting all violations.
pub fn check_disk_mountpoints_policy(
    disk: &DiskCustomization,
    policies: &PathPolicies,
) -> Result<(), PolicyError> {
    let mountpoints = disk.mountpoints();
    debug!(mountpoints = mountpoints.len(), "checking mountpoint policy");

    let violations: Vec<_> = mountpoints
        .iter()
        .filter_map(|mnt| {
            policies.check(mnt.path).err().map(|violation| PolicyViolation {
                path: mnt.path.to_string(),
                violation,
            })
        })
        .collect();

    if violations.is_empty() {
        return Ok(());
    }

    warn!(violations = violations.len(), "mountpoints rejected by policy");

    Err(PolicyError { violations })
}
