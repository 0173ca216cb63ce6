use anyhow::anyhow;
use log::debug;
use std::fs::File;
use std::path::PathBuf;

use crate::error::CaskError;
use crate::runtime::Runtime;

use super::Caskroom;

/// Exclusive per-token lock held while a cask is being uninstalled.
///
/// This is an advisory lock on `<caskroom>/.locks/<token>.lock`. The OS
/// releases it when the guard is dropped or the process dies, so a killed
/// uninstall never leaves the token locked. The lock file itself stays.
#[derive(Debug)]
pub struct TokenLock {
    _file: File,
    path: PathBuf,
}

impl TokenLock {
    /// Take the lock for `token`. The caskroom root must already exist; only
    /// the `.locks` directory below it is created.
    pub fn acquire<R: Runtime>(
        runtime: &R,
        caskroom: &Caskroom,
        token: &str,
    ) -> Result<Self, CaskError> {
        if !runtime.is_dir(caskroom.root()) {
            return Err(anyhow!("Caskroom {:?} does not exist", caskroom.root()).into());
        }

        let locks_dir = caskroom.locks_dir();
        if !runtime.exists(&locks_dir) {
            runtime.create_dir_all(&locks_dir)?;
        }

        let path = caskroom.lock_path(token);
        match runtime.try_lock_exclusive(&path)? {
            Some(file) => {
                debug!("Acquired lock {:?}", path);
                Ok(Self { _file: file, path })
            }
            None => Err(CaskError::Locked {
                token: token.to_string(),
                path,
            }),
        }
    }
}

impl Drop for TokenLock {
    fn drop(&mut self) {
        debug!("Released lock {:?}", self.path);
    }
}
