//! Caskroom management
//!
//! The caskroom is the directory tree holding every installed cask:
//!
//! ```text
//! <caskroom>/
//!   .locks/<token>.lock
//!   <token>/
//!     <version>/
//!     .metadata/<version>/<timestamp>/Casks/<token>.json
//! ```

mod lock;
mod pruner;
mod store;

use std::path::{Path, PathBuf};

pub use lock::TokenLock;
pub use pruner::Pruner;
pub use store::{Snapshot, VersionStore};

pub const METADATA_DIR: &str = ".metadata";
pub const LOCKS_DIR: &str = ".locks";
const CASKS_SUBDIR: &str = "Casks";
pub const DEFINITION_EXTENSION: &str = "json";

/// Path layout of a caskroom rooted at a given directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Caskroom {
    root: PathBuf,
}

impl Caskroom {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns: `<caskroom>/<token>`
    pub fn token_dir(&self, token: &str) -> PathBuf {
        self.root.join(token)
    }

    /// Returns: `<caskroom>/<token>/<version>`
    pub fn version_dir(&self, token: &str, version: &str) -> PathBuf {
        self.token_dir(token).join(version)
    }

    /// Returns: `<caskroom>/<token>/.metadata`
    pub fn metadata_dir(&self, token: &str) -> PathBuf {
        self.token_dir(token).join(METADATA_DIR)
    }

    /// Returns: `<caskroom>/<token>/.metadata/<version>`
    pub fn metadata_version_dir(&self, token: &str, version: &str) -> PathBuf {
        self.metadata_dir(token).join(version)
    }

    /// Returns: `<caskroom>/<token>/.metadata/<version>/<timestamp>/Casks/<token>.json`
    pub fn snapshot_file(&self, token: &str, version: &str, timestamp: &str) -> PathBuf {
        self.metadata_version_dir(token, version)
            .join(timestamp)
            .join(CASKS_SUBDIR)
            .join(definition_file_name(token))
    }

    /// Returns: `<caskroom>/.locks`
    pub fn locks_dir(&self) -> PathBuf {
        self.root.join(LOCKS_DIR)
    }

    /// Returns: `<caskroom>/.locks/<token>.lock`
    pub fn lock_path(&self, token: &str) -> PathBuf {
        self.locks_dir().join(format!("{}.lock", token))
    }
}

/// File name of a definition for `token`, both in taps and in snapshots.
pub fn definition_file_name(token: &str) -> String {
    format!("{}.{}", token, DEFINITION_EXTENSION)
}

/// Whether a directory entry name is bookkeeping rather than a version or token.
pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
