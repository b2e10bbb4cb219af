//! Store file handling shared by the key store and the file vault
//!
//! Files are replaced through a temporary file in the same directory, so a
//! reader sees either the old or the new contents. Read-modify-write cycles
//! are serialized across processes with an exclusive `flock`.

use crate::error::{OtpctlError, StoreError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Exclusive lock on a store, released when dropped
#[derive(Debug)]
pub(crate) struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Block until the lock file at `path` is held exclusively
    pub(crate) fn acquire(path: &Path) -> Result<Self, OtpctlError> {
        let lock_failed = |e: String| {
            OtpctlError::Store(StoreError::LockFailed {
                message: format!("{}: {}", path.display(), e),
            })
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| lock_failed(e.to_string()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| lock_failed(e.to_string()))?;

        #[cfg(unix)]
        {
            use nix::fcntl::{flock, FlockArg};
            use std::os::unix::io::AsRawFd;

            flock(file.as_raw_fd(), FlockArg::LockExclusive)
                .map_err(|e| lock_failed(e.to_string()))?;
        }

        debug!("Acquired store lock {:?}", path);
        Ok(Self { _file: file })
    }
}

/// Atomically replace `path` with `contents`
///
/// The new file is created owner-only (mode 0600 on Unix) before any byte
/// is written.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
