mod btrfs;
mod ident;
mod lvm;
mod mount;
mod plain;

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use super::disk::{Container, DiskCustomization, PartitionKind};
use crate::constants::{DOS_MAX_PARTITIONS, TABLE_DOS, TABLE_GPT};

pub use mount::MountpointError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UuidError {
    #[error("invalid UUID length: {0}")]
    Length(usize),

    #[error("invalid UUID format")]
    Format,
}

/// A single problem found in a [`DiskCustomization`].
/// Findings are collected in declaration order and only joined into text
/// by [`PartitioningError::Invalid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Finding {
    #[error("invalid part_type {0:?}: must be a valid UUID for GPT partition tables or a 2-digit hex number for DOS partition tables")]
    InvalidPartType(String),

    #[error("invalid partition part_type {part_type:?} for partition table type {table_type:?} ({requirement})")]
    PartTypeTableMismatch {
        part_type: String,
        table_type: String,
        requirement: &'static str,
    },

    // Reported as part_type for compatibility with existing tooling
    #[error("part_type is not supported for dos partition tables")]
    PartUuidOnDos,

    #[error("invalid partition part_uuid {part_uuid:?} (must be a valid UUID): {reason}")]
    InvalidPartUuid { part_uuid: String, reason: UuidError },

    #[error("part_label is not supported for dos partition tables")]
    PartLabelOnDos,

    #[error("part_label is not a valid GPT label, it is too long")]
    PartLabelTooLong,

    #[error("unknown partition type: {0}")]
    UnknownPartitionType(String),

    #[error("mountpoint for swap partition must be empty (got {0:?})")]
    SwapWithMountpoint(String),

    #[error(transparent)]
    Mountpoint(#[from] MountpointError),

    #[error("unknown or invalid filesystem type (fs_type) for mountpoint {mountpoint:?}: {fs_type}")]
    InvalidFsType { mountpoint: String, fs_type: String },

    #[error("unsupported filesystem type for {mountpoint:?}: {fs_type}")]
    UnsupportedBootFsType { mountpoint: String, fs_type: String },

    #[error(r#""mountpoint" is not supported for btrfs volumes (only subvolumes can have mountpoints)"#)]
    BtrfsVolumeMountpoint,

    #[error("btrfs volume requires subvolumes")]
    BtrfsNoSubvolumes,

    #[error(r#"LVM logical volumes defined for btrfs volume (partition type "btrfs")"#)]
    BtrfsWithLogicalVolumes,

    #[error("btrfs subvolume with empty name in partitioning customizations")]
    SubvolumeEmptyName,

    #[error("duplicate btrfs subvolume name {0:?} in partitioning customizations")]
    DuplicateSubvolumeName(String),

    #[error("invalid btrfs subvolume customization: {0}")]
    SubvolumeMountpoint(MountpointError),

    /// `/boot` and `/boot/efi` on a subvolume or logical volume
    #[error("invalid mountpoint {mountpoint:?} for {container}")]
    PlainOnlyMountpoint {
        mountpoint: String,
        container: Container,
    },

    #[error("duplicate LVM volume group name {0:?} in partitioning customizations")]
    DuplicateVgName(String),

    #[error(r#"subvolumes defined for LVM volume group (partition type "lvm")"#)]
    VgWithSubvolumes,

    #[error(r#"label {0:?} defined for LVM volume group (partition type "lvm")"#)]
    VgWithLabel(String),

    #[error("duplicate LVM logical volume name {lv:?} in volume group {vg:?} in partitioning customizations")]
    DuplicateLvName { lv: String, vg: String },

    #[error("mountpoint for swap logical volume with name {lv:?} in volume group {vg:?} must be empty")]
    SwapLvWithMountpoint { lv: String, vg: String },

    #[error("invalid logical volume customization: {0}")]
    LvMountpoint(MountpointError),

    #[error("unknown or invalid filesystem type (fs_type) for logical volume with mountpoint {mountpoint:?}: {fs_type}")]
    InvalidLvFsType { mountpoint: String, fs_type: String },

    #[error("duplicate mountpoint {0:?} in partitioning customizations")]
    DuplicateMountpoint(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitioningError {
    #[error("unknown partition table type: {0} (valid: gpt, dos)")]
    UnknownTableType(String),

    #[error(r#"invalid partitioning customizations: "dos" partition table type only supports up to {max} partitions: got {got}"#)]
    TooManyDosPartitions { max: usize, got: usize },

    #[error("invalid partitioning customizations:\n{}", join_lines(.0))]
    Invalid(Vec<Finding>),
}

impl PartitioningError {
    /// Findings of an aggregated error, empty for table-level errors
    pub fn findings(&self) -> &[Finding] {
        match self {
            Self::Invalid(findings) => findings,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("btrfs and lvm partitioning cannot be combined")]
    BtrfsWithLvm,

    #[error("multiple btrfs volumes are not yet supported")]
    MultipleBtrfs,

    #[error("multiple LVM volume groups are not yet supported")]
    MultipleLvm,
}

fn join_lines(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl DiskCustomization {
    /// Validates the partition table and every partition in it.
    ///
    /// Table-level problems are returned immediately. Otherwise each
    /// partition contributes, in order, its identifier findings, at most one
    /// structural finding, and a finding for each of its mountpoints that
    /// repeats an earlier one.
    pub fn validate(&self) -> Result<(), PartitioningError> {
        match self.table_type.as_str() {
            "" | TABLE_GPT => {}
            TABLE_DOS => {
                if self.partitions.len() > DOS_MAX_PARTITIONS {
                    return Err(PartitioningError::TooManyDosPartitions {
                        max: DOS_MAX_PARTITIONS,
                        got: self.partitions.len(),
                    });
                }
            }
            other => return Err(PartitioningError::UnknownTableType(other.to_string())),
        }

        let mountpoints = self.mountpoints();
        let duplicates = mount::duplicates(&mountpoints);

        debug!(
            table_type = %self.table_type,
            partitions = self.partitions.len(),
            mountpoints = mountpoints.len(),
            "validating partitioning customizations"
        );

        // VG names are unique across the whole disk
        let mut vg_names = HashSet::new();
        let mut findings = Vec::new();

        for (i, part) in self.partitions.iter().enumerate() {
            findings.extend(ident::validate(part, &self.table_type));

            let structural = match part.kind() {
                Some(PartitionKind::Plain) => plain::validate(&part.fs),
                Some(PartitionKind::Btrfs) => btrfs::validate(part),
                Some(PartitionKind::Lvm) => lvm::validate(part, &mut vg_names),
                None => Err(Finding::UnknownPartitionType(part.partition_type.clone())),
            };

            if let Err(finding) = structural {
                findings.push(finding);
            }

            findings.extend(
                duplicates
                    .iter()
                    .filter(|mnt| mnt.partition == i)
                    .map(|mnt| Finding::DuplicateMountpoint(mnt.path.to_string())),
            );
        }

        if findings.is_empty() {
            return Ok(());
        }

        warn!(findings = findings.len(), "invalid partitioning customizations");

        Err(PartitioningError::Invalid(findings))
    }

    /// Checks layout combinations the image builder cannot yet produce:
    /// btrfs together with LVM, or more than one of either.
    pub fn validate_layout_constraints(&self) -> Result<(), LayoutError> {
        let mut btrfs = 0;
        let mut lvm = 0;

        for part in &self.partitions {
            match part.kind() {
                Some(PartitionKind::Btrfs) => btrfs += 1,
                Some(PartitionKind::Lvm) => lvm += 1,
                _ => {}
            }

            if btrfs > 0 && lvm > 0 {
                return Err(LayoutError::BtrfsWithLvm);
            }
        }

        debug!(btrfs, lvm, "checking layout constraints");

        if btrfs > 1 {
            return Err(LayoutError::MultipleBtrfs);
        }

        if lvm > 1 {
            return Err(LayoutError::MultipleLvm);
        }

        Ok(())
    }
}
