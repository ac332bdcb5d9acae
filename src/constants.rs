pub mod defaults {
    pub const BLUEPRINT_FILE: &str = "./blueprint.toml";
    pub const LOG_FILTER: &str = "warn";
    pub const LOG_FILTER_VERBOSE: &str = "debug";
}

pub const ENV_BP_POLICY: &str = "BLUEPRINT_POLICY";

// Partition table types
pub const TABLE_GPT: &str = "gpt";
pub const TABLE_DOS: &str = "dos";

// Partition types (the "type" discriminant)
pub const PART_PLAIN: &str = "plain";
pub const PART_BTRFS: &str = "btrfs";
pub const PART_LVM: &str = "lvm";

pub const FS_SWAP: &str = "swap";
pub const FS_VFAT: &str = "vfat";

/// Filesystems allowed on plain partitions and logical volumes.
/// btrfs is a partition type of its own, so it is not in here.
pub const VALID_PLAIN_FS_TYPES: [&str; 3] = ["ext4", "vfat", "xfs"];

/// Filesystems allowed for /boot
pub const VALID_BOOT_FS_TYPES: [&str; 2] = ["ext4", "xfs"];

pub const MNT_BOOT: &str = "/boot";
pub const MNT_BOOT_EFI: &str = "/boot/efi";

// These mountpoints must be on a plain partition (not on LVM or btrfs)
pub const PLAIN_ONLY_MOUNTPOINTS: [&str; 2] = [MNT_BOOT, MNT_BOOT_EFI];

// MS-DOS tables only have 4 primary partitions
pub const DOS_MAX_PARTITIONS: usize = 4;

// GPT partition names are 36 UTF-16 code units
pub const GPT_LABEL_MAX_LEN: usize = 36;

pub const POLICY_BANNER: &str =
    "The following errors occurred while setting up custom mountpoints:";
