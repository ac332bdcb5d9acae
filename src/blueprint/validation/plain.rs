use super::{mount, Finding};
use crate::blueprint::disk::FilesystemTypedCustomization;
use crate::constants::{
    FS_SWAP,
    FS_VFAT,
    MNT_BOOT,
    MNT_BOOT_EFI,
    VALID_BOOT_FS_TYPES,
    VALID_PLAIN_FS_TYPES,
};

pub(super) fn validate(
    fs: &FilesystemTypedCustomization,
) -> Result<(), Finding> {
    if fs.fs_type == FS_SWAP {
        if !fs.mountpoint.is_empty() {
            return Err(Finding::SwapWithMountpoint(fs.mountpoint.clone()));
        }

        return Ok(());
    }

    mount::validate(&fs.mountpoint)?;

    if !VALID_PLAIN_FS_TYPES.contains(&fs.fs_type.as_str()) {
        return Err(Finding::InvalidFsType {
            mountpoint: fs.mountpoint.clone(),
            fs_type: fs.fs_type.clone(),
        });
    }

    let supported = match fs.mountpoint.as_str() {
        MNT_BOOT => VALID_BOOT_FS_TYPES.contains(&fs.fs_type.as_str()),
        MNT_BOOT_EFI => fs.fs_type == FS_VFAT,
        _ => true,
    };

    if !supported {
        return Err(Finding::UnsupportedBootFsType {
            mountpoint: fs.mountpoint.clone(),
            fs_type: fs.fs_type.clone(),
        });
    }

    Ok(())
}
