//! Resolved cask definitions.
//!
//! A definition is either loaded from the live source or reconstructed from a
//! snapshot saved at install time. Callers only see the [`Cask`] trait.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::caskroom::Snapshot;

use super::{Artifact, CaskSpec};

/// Capability set shared by every definition provenance.
pub trait Cask: fmt::Debug {
    fn token(&self) -> &str;
    /// Version this definition is pinned to.
    fn version(&self) -> &str;
    fn artifacts(&self) -> &[Artifact];
    /// File the definition was read from, for diagnostics.
    fn origin(&self) -> &Path;
}

/// Definition loaded from the live definition source.
#[derive(Debug, Clone)]
pub struct LiveCask {
    spec: CaskSpec,
    origin: PathBuf,
}

impl LiveCask {
    pub fn new(spec: CaskSpec, origin: PathBuf) -> Self {
        Self { spec, origin }
    }
}

impl Cask for LiveCask {
    fn token(&self) -> &str {
        &self.spec.token
    }

    fn version(&self) -> &str {
        &self.spec.version
    }

    fn artifacts(&self) -> &[Artifact] {
        &self.spec.artifacts
    }

    fn origin(&self) -> &Path {
        &self.origin
    }
}

/// Definition reconstructed from an install-time snapshot.
///
/// The version is the installed version the snapshot was filed under, which
/// wins over whatever the document itself declares.
#[derive(Debug, Clone)]
pub struct SnapshotCask {
    spec: CaskSpec,
    snapshot: Snapshot,
}

impl SnapshotCask {
    pub fn new(spec: CaskSpec, snapshot: Snapshot) -> Self {
        Self { spec, snapshot }
    }
}

impl Cask for SnapshotCask {
    fn token(&self) -> &str {
        &self.spec.token
    }

    fn version(&self) -> &str {
        &self.snapshot.version
    }

    fn artifacts(&self) -> &[Artifact] {
        &self.spec.artifacts
    }

    fn origin(&self) -> &Path {
        &self.snapshot.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_version_is_pinned_to_install_dir() {
        let spec = CaskSpec {
            token: "ive-been-renamed".into(),
            version: "2.0".into(),
            artifacts: vec![Artifact::App("ive-been-renamed.app".into())],
        };
        let snapshot = Snapshot {
            version: "latest".into(),
            timestamp: "timestamp".into(),
            path: PathBuf::from("/c/ive-been-renamed/.metadata/latest/timestamp/Casks/ive-been-renamed.json"),
        };

        let cask: Box<dyn Cask> = Box::new(SnapshotCask::new(spec, snapshot));

        assert_eq!(cask.token(), "ive-been-renamed");
        assert_eq!(cask.version(), "latest");
        assert_eq!(cask.artifacts().len(), 1);
        assert!(cask.origin().ends_with("Casks/ive-been-renamed.json"));
    }
}
