use std::collections::HashSet;

use super::{mount, Finding};
use crate::blueprint::disk::{Container, PartitionCustomization};
use crate::constants::PLAIN_ONLY_MOUNTPOINTS;

/// Only subvolumes carry mountpoints; the volume itself must not.
pub(super) fn validate(part: &PartitionCustomization) -> Result<(), Finding> {
    if !part.fs.mountpoint.is_empty() {
        return Err(Finding::BtrfsVolumeMountpoint);
    }

    if part.btrfs.subvolumes.is_empty() {
        return Err(Finding::BtrfsNoSubvolumes);
    }

    if !part.vg.logical_volumes.is_empty() {
        return Err(Finding::BtrfsWithLogicalVolumes);
    }

    let mut names = HashSet::new();
    for subvol in &part.btrfs.subvolumes {
        if subvol.name.is_empty() {
            return Err(Finding::SubvolumeEmptyName);
        }

        if !names.insert(subvol.name.as_str()) {
            return Err(Finding::DuplicateSubvolumeName(subvol.name.clone()));
        }

        mount::validate(&subvol.mountpoint).map_err(Finding::SubvolumeMountpoint)?;

        if PLAIN_ONLY_MOUNTPOINTS.contains(&subvol.mountpoint.as_str()) {
            return Err(Finding::PlainOnlyMountpoint {
                mountpoint: subvol.mountpoint.clone(),
                container: Container::Subvolume,
            });
        }
    }

    Ok(())
}
