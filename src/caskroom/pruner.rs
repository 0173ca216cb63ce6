//! Removes caskroom bookkeeping once a version's artifacts are gone.

use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::runtime::Runtime;

use super::VersionStore;

/// Deletes version directories and metadata, and the token root once empty.
///
/// Every operation is idempotent: pruning something already absent is a no-op.
pub struct Pruner<'a, R: Runtime> {
    runtime: &'a R,
    store: &'a VersionStore<'a, R>,
}

impl<'a, R: Runtime> Pruner<'a, R> {
    pub fn new(runtime: &'a R, store: &'a VersionStore<'a, R>) -> Self {
        Self { runtime, store }
    }

    /// Remove `version` of `token` and return the versions still installed.
    ///
    /// When none remain, the token's root directory is removed as well.
    #[tracing::instrument(skip(self))]
    pub fn prune(&self, token: &str, version: &str) -> Result<Vec<String>> {
        let caskroom = self.store.caskroom();

        self.remove_tree(&caskroom.version_dir(token, version))?;
        self.remove_tree(&caskroom.metadata_version_dir(token, version))?;

        let metadata_dir = caskroom.metadata_dir(token);
        if self.runtime.is_dir(&metadata_dir) && self.runtime.read_dir(&metadata_dir)?.is_empty()
        {
            debug!("Removing empty metadata directory {:?}", metadata_dir);
            self.runtime.remove_dir(&metadata_dir)?;
        }

        let remaining = self.store.installed_versions(token)?;
        if remaining.is_empty() {
            self.remove_token_dir(token)?;
        }
        Ok(remaining)
    }

    /// Remove the token root if no version is installed.
    /// Returns true if a directory was removed.
    #[tracing::instrument(skip(self))]
    pub fn prune_token_if_empty(&self, token: &str) -> Result<bool> {
        if !self.store.installed_versions(token)?.is_empty() {
            return Ok(false);
        }
        self.remove_token_dir(token)
    }

    fn remove_token_dir(&self, token: &str) -> Result<bool> {
        let token_dir = self.store.caskroom().token_dir(token);
        if !self.runtime.exists(&token_dir) {
            return Ok(false);
        }
        debug!("No versions of {} remain, removing {:?}", token, token_dir);
        self.runtime.remove_dir_all(&token_dir)?;
        Ok(true)
    }

    fn remove_tree(&self, path: &Path) -> Result<()> {
        if self.runtime.is_symlink(path) {
            debug!("Removing symlink {:?}", path);
            self.runtime.remove_symlink(path)?;
        } else if self.runtime.exists(path) {
            debug!("Removing {:?}", path);
            self.runtime.remove_dir_all(path)?;
        }
        Ok(())
    }
}
