//! Filesystem utilities for atomic file output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Atomically rename a file, with fallback for platforms where rename fails
/// if the target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination
/// already exists. This function handles that case by removing the destination
/// first and retrying. If the rename ultimately fails, the source file is
/// cleaned up.
///
/// # Errors
///
/// Returns an error if the rename fails even after the fallback attempt.
pub fn rename_with_fallback(source: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(source, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(source, destination).map_err(|retry_err| {
            let _ = fs::remove_file(source);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Scratch file next to an output target, removed on drop unless persisted.
///
/// Document rendering writes into the scratch path first and renames the
/// finished file into place, so a failed render never leaves a partial
/// output or a stray temp file behind.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    persisted: bool,
}

impl ScratchFile {
    /// Reserve a scratch path in the same directory as `target`.
    ///
    /// The file itself is not created; callers write to `path()` and then
    /// either `persist()` or drop the guard.
    pub fn for_target(target: &Path) -> io::Result<Self> {
        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let filename = target
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "Invalid output filename")
            })?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("System time error: {}", e)))?
            .as_nanos();
        Ok(Self {
            path: parent.join(format!("{}.{}.tmp", filename, nanos)),
            persisted: false,
        })
    }

    /// The scratch path to write into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the scratch file into place at `target`.
    pub fn persist(mut self, target: &Path) -> io::Result<()> {
        rename_with_fallback(&self.path, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}
