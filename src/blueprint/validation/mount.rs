use std::collections::HashSet;

use thiserror::Error;

use crate::blueprint::disk::MountpointRef;
use crate::utils::path;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountpointError {
    #[error("mountpoint is empty")]
    Empty,

    #[error("mountpoint {0:?} is not an absolute path")]
    NotAbsolute(String),

    #[error("mountpoint {path:?} is not a canonical path (did you mean {canonical:?}?)")]
    NotCanonical { path: String, canonical: String },
}

pub(super) fn validate(mountpoint: &str) -> Result<(), MountpointError> {
    if mountpoint.is_empty() {
        return Err(MountpointError::Empty);
    }

    if !mountpoint.starts_with('/') {
        return Err(MountpointError::NotAbsolute(mountpoint.to_string()));
    }

    let canonical = path::clean(mountpoint);
    if canonical != mountpoint {
        return Err(MountpointError::NotCanonical {
            path: mountpoint.to_string(),
            canonical,
        });
    }

    Ok(())
}

/// Single linear scan over the flattened mountpoints, returning every
/// repeat of an earlier mountpoint (the first occurrence is not returned).
pub(super) fn duplicates<'a>(
    mountpoints: &[MountpointRef<'a>],
) -> Vec<MountpointRef<'a>> {
    let mut seen = HashSet::new();

    mountpoints
        .iter()
        .filter(|mnt| !seen.insert(mnt.path))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::disk::Container;

    #[test]
    fn test_validate() {
        let tests = vec![
            ("/", Ok(())),
            ("/home", Ok(())),
            ("/var/log", Ok(())),
            ("", Err("mountpoint is empty")),
            ("i-am-not-absolute", Err(r#"mountpoint "i-am-not-absolute" is not an absolute path"#)),
            (
                "/home/../root",
                Err(r#"mountpoint "/home/../root" is not a canonical path (did you mean "/root"?)"#),
            ),
            (
                "/home//bork",
                Err(r#"mountpoint "/home//bork" is not a canonical path (did you mean "/home/bork"?)"#),
            ),
            (
                "/../../../what/",
                Err(r#"mountpoint "/../../../what/" is not a canonical path (did you mean "/what"?)"#),
            ),
        ];

        for (mountpoint, expected) in tests {
            let result = validate(mountpoint).map_err(|err| err.to_string());
            assert_eq!(
                result,
                expected.map_err(String::from),
                "unexpected result for {mountpoint:?}"
            );
        }
    }

    #[test]
    fn test_duplicates() {
        let mnt = |partition, path| MountpointRef {
            partition,
            container: Container::Partition,
            name: "",
            path,
        };

        let flat = vec![
            mnt(0, "/data"),
            mnt(1, "/"),
            mnt(2, "/data"),
            mnt(3, "/data"),
            mnt(4, "/home"),
        ];
        let dups = duplicates(&flat);

        assert_eq!(dups, vec![mnt(2, "/data"), mnt(3, "/data")]);
    }
}
