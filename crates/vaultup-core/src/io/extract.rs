//! Release archive unpacking.
//!
//! Releases ship as flat zip archives holding a single executable, sometimes
//! next to a license or readme.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Archive did not contain '{0}'")]
    MissingExecutable(String),
}

fn archive_error(e: zip::result::ZipError) -> ExtractError {
    ExtractError::Archive(e.to_string())
}

/// Unpack every entry of `archive_path` into `dest_dir` and return the path
/// of `executable`.
///
/// Entries that would land outside `dest_dir` are skipped. The executable
/// always ends up with its execute bits set, whatever mode the archive
/// recorded for it.
pub fn extract_release(
    archive_path: &Path,
    dest_dir: &Path,
    executable: &str,
) -> Result<PathBuf, ExtractError> {
    let mut archive = ZipArchive::new(File::open(archive_path)?).map_err(archive_error)?;
    fs::create_dir_all(dest_dir)?;

    let mut found = None;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(archive_error)?;
        let Some(name) = entry.enclosed_name() else {
            warn!(entry = %entry.name(), "skipping entry outside destination");
            continue;
        };

        let target = dest_dir.join(&name);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        io::copy(&mut entry, &mut File::create(&target)?)?;

        let is_executable = name == Path::new(executable);
        #[cfg(unix)]
        apply_mode(&target, entry.unix_mode(), is_executable)?;

        debug!(path = %target.display(), "unpacked");
        if is_executable {
            found = Some(target);
        }
    }

    found.ok_or_else(|| ExtractError::MissingExecutable(executable.to_string()))
}

#[cfg(unix)]
fn apply_mode(path: &Path, recorded: Option<u32>, executable: bool) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = match (recorded, executable) {
        (Some(mode), false) => mode,
        (Some(mode), true) => mode | 0o111,
        (None, true) => 0o755,
        (None, false) => return Ok(()),
    };
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

/// [`extract_release`] on the blocking pool.
pub async fn unpack_release(
    archive_path: PathBuf,
    dest_dir: PathBuf,
    executable: String,
) -> Result<PathBuf, ExtractError> {
    tokio::task::spawn_blocking(move || extract_release(&archive_path, &dest_dir, &executable))
        .await
        .map_err(|e| ExtractError::Archive(format!("extraction task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8], Option<u32>)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, data, mode) in entries {
            let mut opts = SimpleFileOptions::default();
            if let Some(mode) = mode {
                opts = opts.unix_permissions(*mode);
            }
            zip.start_file(*name, opts).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn returns_executable_and_keeps_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_zip(
            &archive,
            &[
                ("vault", b"#!/bin/sh\n", Some(0o755)),
                ("LICENSE.txt", b"MPL-2.0", Some(0o644)),
            ],
        );

        let out = dir.path().join("out");
        let exe = extract_release(&archive, &out, "vault").unwrap();

        assert_eq!(exe, out.join("vault"));
        assert_eq!(fs::read(&exe).unwrap(), b"#!/bin/sh\n");
        assert_eq!(fs::read(out.join("LICENSE.txt")).unwrap(), b"MPL-2.0");
        #[cfg(unix)]
        assert_eq!(mode_of(&out.join("LICENSE.txt")), 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn executable_gains_execute_bits() {
        let dir = tempfile::tempdir().unwrap();
        let recorded = dir.path().join("recorded.zip");
        write_zip(&recorded, &[("vault", b"bin", Some(0o644))]);
        let unrecorded = dir.path().join("unrecorded.zip");
        write_zip(&unrecorded, &[("vault", b"bin", None)]);

        let exe = extract_release(&recorded, &dir.path().join("a"), "vault").unwrap();
        assert_eq!(mode_of(&exe), 0o755);

        let exe = extract_release(&unrecorded, &dir.path().join("b"), "vault").unwrap();
        assert_eq!(mode_of(&exe), 0o755);
    }

    #[test]
    fn skips_escaping_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(
            &archive,
            &[("../escape", b"x", None), ("vault", b"ok", None)],
        );

        let out = dir.path().join("out");
        let exe = extract_release(&archive, &out, "vault").unwrap();

        assert_eq!(exe, out.join("vault"));
        assert!(!dir.path().join("escape").exists());
    }

    #[test]
    fn garbage_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("junk.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_release(&archive, &dir.path().join("out"), "vault").unwrap_err();
        assert!(matches!(err, ExtractError::Archive(_)));
    }

    #[test]
    fn nested_executable_does_not_count() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("bin/vault", b"bin", Some(0o755))]);

        let err = extract_release(&archive, &dir.path().join("out"), "vault").unwrap_err();
        assert!(matches!(err, ExtractError::MissingExecutable(name) if name == "vault"));
    }

    #[tokio::test]
    async fn unpack_runs_off_the_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("vault.exe", b"MZ", None)]);

        let out = dir.path().join("0.9.1");
        let exe = unpack_release(archive, out.clone(), "vault.exe".to_string())
            .await
            .unwrap();
        assert_eq!(exe, out.join("vault.exe"));
    }

    #[tokio::test]
    async fn unpack_reports_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("README", b"nothing here", None)]);

        let err = unpack_release(archive, dir.path().join("out"), "vault".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::MissingExecutable(name) if name == "vault"));
    }
}
