use uuid::Uuid;

use super::{Finding, UuidError};
use crate::blueprint::disk::PartitionCustomization;
use crate::constants::{GPT_LABEL_MAX_LEN, TABLE_DOS, TABLE_GPT};

/// Checks `part_type`, `part_uuid` and `part_label` against the partition
/// table type. Each identifier yields at most one finding.
pub(super) fn validate(
    part: &PartitionCustomization,
    table_type: &str,
) -> Vec<Finding> {
    [
        validate_part_type(&part.part_type, table_type),
        validate_part_uuid(&part.part_uuid, table_type),
        validate_part_label(&part.part_label, table_type),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn validate_part_type(part_type: &str, table_type: &str) -> Option<Finding> {
    if part_type.is_empty() {
        return None;
    }

    let is_uuid = Uuid::try_parse(part_type).is_ok();
    let is_dos = is_dos_type_code(part_type);

    if !is_uuid && !is_dos {
        return Some(Finding::InvalidPartType(part_type.to_string()));
    }

    let requirement = match table_type {
        TABLE_GPT if !is_uuid => "must be a valid UUID",
        TABLE_DOS if !is_dos => "must be a 2-digit hex number",
        // No explicit table type: either shape is fine
        _ => return None,
    };

    Some(Finding::PartTypeTableMismatch {
        part_type: part_type.to_string(),
        table_type: table_type.to_string(),
        requirement,
    })
}

fn validate_part_uuid(part_uuid: &str, table_type: &str) -> Option<Finding> {
    if part_uuid.is_empty() {
        return None;
    }

    if table_type == TABLE_DOS {
        return Some(Finding::PartUuidOnDos);
    }

    parse_uuid(part_uuid)
        .err()
        .map(|reason| Finding::InvalidPartUuid {
            part_uuid: part_uuid.to_string(),
            reason,
        })
}

fn validate_part_label(part_label: &str, table_type: &str) -> Option<Finding> {
    if part_label.is_empty() {
        return None;
    }

    if table_type == TABLE_DOS {
        return Some(Finding::PartLabelOnDos);
    }

    if part_label.encode_utf16().count() > GPT_LABEL_MAX_LEN {
        return Some(Finding::PartLabelTooLong);
    }

    None
}

/// DOS partition type codes are exactly 2 hex digits, e.g. "83" or "ef"
fn is_dos_type_code(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

// Accepted forms: simple (32), hyphenated (36), braced (38) and urn (45)
fn parse_uuid(s: &str) -> Result<Uuid, UuidError> {
    Uuid::try_parse(s).map_err(|_| match s.len() {
        32 | 36 | 38 | 45 => UuidError::Format,
        len => UuidError::Length(len),
    })
}
