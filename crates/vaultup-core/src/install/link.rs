//! The stable link path (`/usr/local/bin/vault` by default).
//!
//! Only symbolic links are ever created, replaced or removed here. Anything
//! else found at the link path is left alone and reported as
//! [`InstallError::StateConflict`].

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::InstallError;

/// What currently occupies the link path.
#[derive(Debug)]
enum Slot {
    Empty,
    Symlink,
    Occupied,
}

fn inspect(link: &Path) -> Result<Slot, InstallError> {
    match std::fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => Ok(Slot::Symlink),
        Ok(_) => Ok(Slot::Occupied),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Slot::Empty),
        Err(e) => Err(InstallError::io(link, e)),
    }
}

/// Fail with `StateConflict` unless `link` is absent or a symbolic link.
pub fn ensure_link_slot(link: &Path) -> Result<(), InstallError> {
    match inspect(link)? {
        Slot::Occupied => Err(InstallError::StateConflict {
            path: link.to_path_buf(),
        }),
        Slot::Empty | Slot::Symlink => Ok(()),
    }
}

/// Make `link` a symbolic link to `target`.
///
/// Returns `false` when the link already pointed there and nothing changed.
pub fn point_symlink(link: &Path, target: &Path) -> Result<bool, InstallError> {
    match inspect(link)? {
        Slot::Occupied => {
            return Err(InstallError::StateConflict {
                path: link.to_path_buf(),
            });
        }
        Slot::Symlink => {
            let current = std::fs::read_link(link).map_err(|e| InstallError::io(link, e))?;
            if current == target {
                debug!(link = %link.display(), "link already current");
                return Ok(false);
            }
            std::fs::remove_file(link).map_err(|e| InstallError::io(link, e))?;
        }
        Slot::Empty => {
            if let Some(parent) = link.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| InstallError::io(parent, e))?;
            }
        }
    }

    create_symlink(target, link).map_err(|e| InstallError::io(link, e))?;
    debug!(link = %link.display(), target = %target.display(), "linked");
    Ok(true)
}

/// Remove `link` if it is a symbolic link.
///
/// Returns `false` when nothing was there.
pub fn remove_symlink(link: &Path) -> Result<bool, InstallError> {
    match inspect(link)? {
        Slot::Empty => Ok(false),
        Slot::Occupied => Err(InstallError::StateConflict {
            path: link.to_path_buf(),
        }),
        Slot::Symlink => {
            std::fs::remove_file(link).map_err(|e| InstallError::io(link, e))?;
            Ok(true)
        }
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
