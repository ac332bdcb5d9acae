use std::collections::HashSet;

use super::{mount, Finding};
use crate::blueprint::disk::{Container, PartitionCustomization};
use crate::constants::{FS_SWAP, PLAIN_ONLY_MOUNTPOINTS, VALID_PLAIN_FS_TYPES};

/// Validates a volume group and its logical volumes.
/// `vg_names` carries the non-empty VG names seen so far on the disk.
pub(super) fn validate<'a>(
    part: &'a PartitionCustomization,
    vg_names: &mut HashSet<&'a str>,
) -> Result<(), Finding> {
    let vg = &part.vg;

    // Empty names get generated later, so they never clash
    if !vg.name.is_empty() && !vg_names.insert(&vg.name) {
        return Err(Finding::DuplicateVgName(vg.name.clone()));
    }

    if !part.btrfs.subvolumes.is_empty() {
        return Err(Finding::VgWithSubvolumes);
    }

    if !part.fs.label.is_empty() {
        return Err(Finding::VgWithLabel(part.fs.label.clone()));
    }

    let mut lv_names = HashSet::new();
    for lv in &vg.logical_volumes {
        if !lv.name.is_empty() && !lv_names.insert(lv.name.as_str()) {
            return Err(Finding::DuplicateLvName {
                lv: lv.name.clone(),
                vg: vg.name.clone(),
            });
        }

        if lv.fs_type == FS_SWAP {
            if !lv.mountpoint.is_empty() {
                return Err(Finding::SwapLvWithMountpoint {
                    lv: lv.name.clone(),
                    vg: vg.name.clone(),
                });
            }

            continue;
        }

        mount::validate(&lv.mountpoint).map_err(Finding::LvMountpoint)?;

        if PLAIN_ONLY_MOUNTPOINTS.contains(&lv.mountpoint.as_str()) {
            return Err(Finding::PlainOnlyMountpoint {
                mountpoint: lv.mountpoint.clone(),
                container: Container::LogicalVolume,
            });
        }

        if !VALID_PLAIN_FS_TYPES.contains(&lv.fs_type.as_str()) {
            return Err(Finding::InvalidLvFsType {
                mountpoint: lv.mountpoint.clone(),
                fs_type: lv.fs_type.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::disk::{LVCustomization, VGCustomization};

    fn vg(name: &str, lvs: Vec<LVCustomization>) -> PartitionCustomization {
        PartitionCustomization {
            partition_type: "lvm".into(),
            vg: VGCustomization {
                name: name.into(),
                logical_volumes: lvs,
            },
            ..Default::default()
        }
    }

    fn lv(name: &str, mountpoint: &str, fs_type: &str) -> LVCustomization {
        LVCustomization {
            name: name.into(),
            mountpoint: mountpoint.into(),
            fs_type: fs_type.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_vg_names_shared_across_calls() {
        let first = vg("rootvg", vec![lv("rootlv", "/", "xfs")]);
        let second = vg("rootvg", vec![lv("datalv", "/data", "xfs")]);
        let unnamed = vg("", vec![lv("homelv", "/home", "xfs")]);
        let unnamed_too = vg("", vec![lv("srvlv", "/srv", "xfs")]);

        let mut names = HashSet::new();
        assert_eq!(validate(&first, &mut names), Ok(()));
        assert_eq!(validate(&unnamed, &mut names), Ok(()));
        assert_eq!(validate(&unnamed_too, &mut names), Ok(()));
        assert_eq!(
            validate(&second, &mut names),
            Err(Finding::DuplicateVgName("rootvg".into()))
        );
    }

    #[test]
    fn test_swap_lv_skips_remaining_checks() {
        // The swap LV has no mountpoint, the next LV still gets checked
        let part = vg("vg0", vec![lv("swaplv", "", "swap"), lv("bad", "/var", "ntfs")]);

        assert_eq!(
            validate(&part, &mut HashSet::new()),
            Err(Finding::InvalidLvFsType {
                mountpoint: "/var".into(),
                fs_type: "ntfs".into(),
            })
        );
    }
}
