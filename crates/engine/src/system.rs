//! Filesystem helpers for hook slots
//!
//! Executable-bit toggling, content comparison and script placement. Errors
//! carry the path that failed.

use hooky_config::LinkMode;
use hooky_core::{Error, Result};
use std::fs;
use std::path::Path;

fn io_err(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::Io(std::io::Error::new(
        e.kind(),
        format!("Failed to {action} {}: {e}", path.display()),
    ))
}

/// Whether a file exists and has any executable bit set
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// Set or clear the executable bits of a file
///
/// Setting mirrors `chmod +x` for every class that can read the file.
/// Calling it on a file already in the requested state changes nothing.
pub fn set_executable(path: &Path, executable: bool) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| io_err("read metadata for", path, &e))?;
        let mode = metadata.permissions().mode();
        let new_mode = if executable {
            mode | ((mode & 0o444) >> 2)
        } else {
            mode & !0o111
        };

        if new_mode != mode {
            tracing::debug!(path = %path.display(), "Changing file mode {mode:o} -> {new_mode:o}");
            fs::set_permissions(path, fs::Permissions::from_mode(new_mode))
                .map_err(|e| io_err("set permissions on", path, &e))?;
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (path, executable);
    }

    Ok(())
}

/// Whether a file's bytes equal `expected`
///
/// A missing file is never equal.
pub fn same_content(path: &Path, expected: &[u8]) -> Result<bool> {
    match fs::read(path) {
        Ok(content) => Ok(content == expected),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err("read", path, &e)),
    }
}

/// Write `content` to `path` and mark it executable
pub fn write_executable(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content).map_err(|e| io_err("write", path, &e))?;
    set_executable(path, true)
}

/// Place `source` at `dest` by symlink or copy
///
/// Copies keep the source permissions, so an executable source stays executable.
pub fn link_or_copy(source: &Path, dest: &Path, mode: LinkMode) -> Result<()> {
    match mode {
        LinkMode::Symlink => symlink(source, dest),
        LinkMode::Copy => fs::copy(source, dest)
            .map(|_| ())
            .map_err(|e| io_err("copy script to", dest, &e)),
    }
}

fn symlink(source: &Path, dest: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, dest).map_err(|e| io_err("create symlink", dest, &e))
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(source, dest)
            .map_err(|e| io_err("create symlink", dest, &e))
    }
}

/// Remove a file, treating a missing file as already removed
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err("remove", path, &e)),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_same_content() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, b"abc").unwrap();

        assert!(same_content(&file, b"abc").unwrap());
        assert!(!same_content(&file, b"abcd").unwrap());
        assert!(!same_content(&temp.path().join("missing"), b"abc").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_set_executable_round_trip() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("script");
        fs::write(&file, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable(&file));

        set_executable(&file, true).unwrap();
        assert!(is_executable(&file));
        assert_eq!(fs::metadata(&file).unwrap().permissions().mode() & 0o777, 0o755);

        // Idempotent
        set_executable(&file, true).unwrap();
        assert_eq!(fs::metadata(&file).unwrap().permissions().mode() & 0o777, 0o755);

        set_executable(&file, false).unwrap();
        assert!(!is_executable(&file));
        assert_eq!(fs::metadata(&file).unwrap().permissions().mode() & 0o777, 0o644);
    }

    #[test]
    fn test_remove_file_if_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        fs::write(&file, b"x").unwrap();

        assert!(remove_file_if_exists(&file).unwrap());
        assert!(!remove_file_if_exists(&file).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_link_or_copy() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("check.sh");
        write_executable(&source, b"#!/bin/sh\nexit 0\n").unwrap();

        let linked = temp.path().join("linked");
        link_or_copy(&source, &linked, LinkMode::Symlink).unwrap();
        assert!(fs::symlink_metadata(&linked).unwrap().file_type().is_symlink());

        let copied = temp.path().join("copied");
        link_or_copy(&source, &copied, LinkMode::Copy).unwrap();
        assert!(!fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
        assert!(is_executable(&copied));
    }
}
