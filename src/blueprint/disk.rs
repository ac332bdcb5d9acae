use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{FS_SWAP, PART_BTRFS, PART_LVM, PART_PLAIN};
use crate::entity::{deserialize_size, is_zero};

/// Partitioning customization for the whole disk.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskCustomization {
    /// Partition table type: "gpt", "dos", or empty for the default (gpt)
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub table_type: String,

    #[serde(
        rename = "minsize",
        deserialize_with = "deserialize_size",
        skip_serializing_if = "is_zero"
    )]
    pub min_size: u64,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<PartitionCustomization>,
}

/// Resolved partition type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionKind {
    Plain,
    Btrfs,
    Lvm,
}

impl PartitionKind {
    /// Empty means plain. Unknown types yield None.
    pub fn from_type(s: &str) -> Option<Self> {
        match s {
            "" | PART_PLAIN => Some(Self::Plain),
            PART_BTRFS => Some(Self::Btrfs),
            PART_LVM => Some(Self::Lvm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => PART_PLAIN,
            Self::Btrfs => PART_BTRFS,
            Self::Lvm => PART_LVM,
        }
    }
}

impl std::fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single partition. `partition_type` selects which of the payloads
/// (`fs`, `btrfs`, `vg`) is meaningful; the decoder guarantees the others
/// are left empty.
///
/// Deserialization goes through the discriminated decoder in
/// [`decode`](super::decode), serialization only writes the fields of
/// the selected type.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartitionCustomization {
    pub partition_type: String,
    pub min_size: u64,

    /// GPT partition type UUID or DOS 2-digit hex type code
    pub part_type: String,

    /// GPT only
    pub part_uuid: String,

    /// GPT only
    pub part_label: String,

    pub fs: FilesystemTypedCustomization,
    pub btrfs: BtrfsVolumeCustomization,
    pub vg: VGCustomization,
}

impl PartitionCustomization {
    pub fn kind(&self) -> Option<PartitionKind> {
        PartitionKind::from_type(&self.partition_type)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesystemTypedCustomization {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mountpoint: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub fs_type: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtrfsVolumeCustomization {
    #[serde(default)]
    pub subvolumes: Vec<BtrfsSubvolumeCustomization>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BtrfsSubvolumeCustomization {
    /// Subvolume path within the volume, e.g. "subvols/root"
    pub name: String,

    pub mountpoint: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VGCustomization {
    /// Volume group name. Empty names are generated by the image builder.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub logical_volumes: Vec<LVCustomization>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LVCustomization {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(
        rename = "minsize",
        deserialize_with = "deserialize_size",
        skip_serializing_if = "is_zero"
    )]
    pub min_size: u64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub mountpoint: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub fs_type: String,
}

/// What holds a mountpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Partition,
    Subvolume,
    LogicalVolume,
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Partition => write!(f, "partition"),
            Self::Subvolume => write!(f, "btrfs subvolume"),
            Self::LogicalVolume => write!(f, "logical volume"),
        }
    }
}

/// A mountpoint declared somewhere in a [`DiskCustomization`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountpointRef<'a> {
    /// Index of the owning partition
    pub partition: usize,
    pub container: Container,

    /// Subvolume or logical volume name, empty for plain partitions
    pub name: &'a str,
    pub path: &'a str,
}

impl DiskCustomization {
    /// Flattens all declared mountpoints, in declaration order.
    /// Empty mountpoints are skipped, and so are swap mountpoints since
    /// swap is never mounted.
    pub fn mountpoints(&self) -> Vec<MountpointRef<'_>> {
        let mut mountpoints = Vec::new();

        for (i, part) in self.partitions.iter().enumerate() {
            if !part.fs.mountpoint.is_empty() && part.fs.fs_type != FS_SWAP {
                mountpoints.push(MountpointRef {
                    partition: i,
                    container: Container::Partition,
                    name: "",
                    path: &part.fs.mountpoint,
                });
            }

            for subvol in &part.btrfs.subvolumes {
                if subvol.mountpoint.is_empty() {
                    continue;
                }

                mountpoints.push(MountpointRef {
                    partition: i,
                    container: Container::Subvolume,
                    name: &subvol.name,
                    path: &subvol.mountpoint,
                });
            }

            for lv in &part.vg.logical_volumes {
                if lv.mountpoint.is_empty() || lv.fs_type == FS_SWAP {
                    continue;
                }

                mountpoints.push(MountpointRef {
                    partition: i,
                    container: Container::LogicalVolume,
                    name: &lv.name,
                    path: &lv.mountpoint,
                });
            }
        }

        mountpoints
    }
}

impl Serialize for PartitionCustomization {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        // Scalars go first so that TOML tables can follow
        if !self.partition_type.is_empty() {
            map.serialize_entry("type", &self.partition_type)?;
        }

        map.serialize_entry("minsize", &self.min_size)?;

        for (key, value) in [
            ("part_type", &self.part_type),
            ("part_uuid", &self.part_uuid),
            ("part_label", &self.part_label),
        ] {
            if !value.is_empty() {
                map.serialize_entry(key, value)?;
            }
        }

        match self.kind() {
            Some(PartitionKind::Btrfs) => {
                if !self.btrfs.subvolumes.is_empty() {
                    map.serialize_entry("subvolumes", &self.btrfs.subvolumes)?;
                }
            }

            Some(PartitionKind::Lvm) => {
                if !self.vg.name.is_empty() {
                    map.serialize_entry("name", &self.vg.name)?;
                }

                if !self.vg.logical_volumes.is_empty() {
                    map.serialize_entry("logical_volumes", &self.vg.logical_volumes)?;
                }
            }

            // Plain, or unknown types which will not pass validation anyway
            _ => {
                for (key, value) in [
                    ("mountpoint", &self.fs.mountpoint),
                    ("label", &self.fs.label),
                    ("fs_type", &self.fs.fs_type),
                ] {
                    if !value.is_empty() {
                        map.serialize_entry(key, value)?;
                    }
                }
            }
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for PartitionCustomization {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bag = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        super::decode::decode_partition(bag).map_err(serde::de::Error::custom)
    }
}
