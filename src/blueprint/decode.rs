//! Discriminated decoding of partitions.
//!
//! A partition node is first read as a generic bag of fields, the `type`
//! discriminant is resolved, every key is checked against the keys declared
//! for that type, and only then is the bag decoded into the strict variant.
//! The first failure aborts decoding of the node.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::disk::*;
use crate::entity::{size_from_value, SizeError};

const KEY_TYPE: &str = "type";
const KEY_MINSIZE: &str = "minsize";

const COMMON_KEYS: [&str; 5] = [KEY_TYPE, KEY_MINSIZE, "part_type", "part_uuid", "part_label"];
const PLAIN_KEYS: [&str; 3] = ["mountpoint", "label", "fs_type"];
const BTRFS_KEYS: [&str; 1] = ["subvolumes"];
const LVM_KEYS: [&str; 2] = ["name", "logical_volumes"];

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("type must be a string, got {0}")]
    TypeNotString(String),

    #[error("unknown partition type: {0}")]
    UnknownPartitionType(String),

    #[error("error decoding partition with type {partition_type:?}: unknown field {field:?}")]
    UnknownField {
        partition_type: String,
        field: String,
    },

    #[error("error decoding partition with type {partition_type:?}: {source}")]
    Malformed {
        partition_type: String,
        source: serde_json::Error,
    },

    #[error("minsize is required")]
    MissingMinSize,

    #[error("error decoding minsize for partition: {0}")]
    BadMinSize(SizeError),
}

/// Returns the first key of `bag` not found in any of `allowed`
pub(crate) fn first_unknown_key<'a>(
    bag: &'a Map<String, Value>,
    allowed: &[&[&str]],
) -> Option<&'a str> {
    bag.keys()
        .map(String::as_str)
        .find(|key| !allowed.iter().any(|keys| keys.contains(key)))
}

/// Reads the `type` discriminant. Absent and null both mean empty.
pub(crate) fn read_type(bag: &Map<String, Value>) -> Result<String, Value> {
    match bag.get(KEY_TYPE) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(other.clone()),
    }
}

// Strict shapes, one per partition type. minsize is handled separately.

#[derive(Deserialize, Default)]
#[serde(default)]
struct CommonFields {
    part_type: String,
    part_uuid: String,
    part_label: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PlainFields {
    #[serde(flatten)]
    common: CommonFields,
    mountpoint: String,
    label: String,
    fs_type: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct BtrfsFields {
    #[serde(flatten)]
    common: CommonFields,
    subvolumes: Vec<BtrfsSubvolumeCustomization>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct LvmFields {
    #[serde(flatten)]
    common: CommonFields,
    name: String,
    logical_volumes: Vec<LVCustomization>,
}

pub fn decode_partition(
    mut bag: Map<String, Value>,
) -> Result<PartitionCustomization, DecodeError> {
    let partition_type =
        read_type(&bag).map_err(|value| DecodeError::TypeNotString(value.to_string()))?;

    let kind = PartitionKind::from_type(&partition_type)
        .ok_or_else(|| DecodeError::UnknownPartitionType(partition_type.clone()))?;

    let variant_keys: &[&str] = match kind {
        PartitionKind::Plain => &PLAIN_KEYS,
        PartitionKind::Btrfs => &BTRFS_KEYS,
        PartitionKind::Lvm => &LVM_KEYS,
    };

    if let Some(field) = first_unknown_key(&bag, &[&COMMON_KEYS, variant_keys]) {
        return Err(DecodeError::UnknownField {
            partition_type: kind.to_string(),
            field: field.to_string(),
        });
    }

    bag.remove(KEY_TYPE);
    let min_size = bag.remove(KEY_MINSIZE);

    let malformed = |source| DecodeError::Malformed {
        partition_type: kind.to_string(),
        source,
    };

    let mut part = match kind {
        PartitionKind::Plain => {
            let fields: PlainFields =
                serde_json::from_value(Value::Object(bag)).map_err(malformed)?;
            with_common(
                fields.common,
                PartitionCustomization {
                    fs: FilesystemTypedCustomization {
                        mountpoint: fields.mountpoint,
                        label: fields.label,
                        fs_type: fields.fs_type,
                    },
                    ..Default::default()
                },
            )
        }

        PartitionKind::Btrfs => {
            let fields: BtrfsFields =
                serde_json::from_value(Value::Object(bag)).map_err(malformed)?;
            with_common(
                fields.common,
                PartitionCustomization {
                    btrfs: BtrfsVolumeCustomization {
                        subvolumes: fields.subvolumes,
                    },
                    ..Default::default()
                },
            )
        }

        PartitionKind::Lvm => {
            let fields: LvmFields =
                serde_json::from_value(Value::Object(bag)).map_err(malformed)?;
            with_common(
                fields.common,
                PartitionCustomization {
                    vg: VGCustomization {
                        name: fields.name,
                        logical_volumes: fields.logical_volumes,
                    },
                    ..Default::default()
                },
            )
        }
    };

    part.partition_type = partition_type;
    part.min_size = match min_size {
        None => return Err(DecodeError::MissingMinSize),
        Some(value) => size_from_value(&value).map_err(DecodeError::BadMinSize)?,
    };

    Ok(part)
}

fn with_common(
    common: CommonFields,
    part: PartitionCustomization,
) -> PartitionCustomization {
    PartitionCustomization {
        part_type: common.part_type,
        part_uuid: common.part_uuid,
        part_label: common.part_label,
        ..part
    }
}
