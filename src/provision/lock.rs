//! Cross-process guard so only one provisioning run touches the device.

use super::types::ProvisionError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// An exclusive advisory lock held for the lifetime of the value.
#[derive(Debug)]
pub struct ProvisionLock {
    file: File,
    path: PathBuf,
}

impl ProvisionLock {
    /// Takes the lock without waiting. A lock held elsewhere yields
    /// [`ProvisionError::InProgress`].
    pub fn acquire(path: &Path) -> Result<Self, ProvisionError> {
        let lock_error = |source| ProvisionError::Lock {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(lock_error)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(lock_error)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                log::debug!("Acquired provisioning lock {}", path.display());
                Ok(Self {
                    file,
                    path: path.to_path_buf(),
                })
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => Err(ProvisionError::InProgress),
            Err(err) => Err(lock_error(err)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProvisionLock {
    fn drop(&mut self) {
        FileExt::unlock(&self.file).unwrap_or_else(|err| {
            log::warn!(
                "failed to unlock provisioning lock {}: {}",
                self.path.display(),
                err
            )
        });
    }
}
