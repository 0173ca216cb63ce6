//! Registry of installed cask versions, backed by the caskroom directory tree.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::{Caskroom, is_hidden};

/// A definition snapshot captured when a version was installed.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: String,
    pub timestamp: String,
    /// The saved definition file (may be missing on disk).
    pub path: PathBuf,
}

/// Read-only view of which versions of each cask are installed.
pub struct VersionStore<'a, R: Runtime> {
    runtime: &'a R,
    caskroom: Caskroom,
}

impl<'a, R: Runtime> VersionStore<'a, R> {
    pub fn new(runtime: &'a R, caskroom: Caskroom) -> Self {
        Self { runtime, caskroom }
    }

    pub fn caskroom(&self) -> &Caskroom {
        &self.caskroom
    }

    /// Installed versions of `token`, oldest install first.
    ///
    /// Versions come from the timestamped metadata snapshots; a version installed
    /// more than once is positioned by its latest timestamp. Version directories
    /// without any metadata are appended in name order.
    #[tracing::instrument(skip(self))]
    pub fn installed_versions(&self, token: &str) -> Result<Vec<String>> {
        let token_dir = self.caskroom.token_dir(token);
        if !self.runtime.exists(&token_dir) {
            return Ok(vec![]);
        }

        let mut timestamped = self.timestamped_versions(token)?;
        timestamped.sort_by(|a, b| (&a.1, &a.0).cmp(&(&b.1, &b.0)));

        let mut versions: Vec<String> = Vec::new();
        for (version, _) in timestamped.into_iter().rev() {
            if !versions.contains(&version) {
                versions.push(version);
            }
        }
        versions.reverse();

        let mut untracked: Vec<String> = self
            .child_dir_names(&token_dir)?
            .into_iter()
            .filter(|name| !versions.contains(name))
            .collect();
        untracked.sort();
        if !untracked.is_empty() {
            debug!("{} has version directories without metadata: {:?}", token, untracked);
        }
        versions.extend(untracked);

        Ok(versions)
    }

    pub fn is_installed(&self, token: &str) -> Result<bool> {
        Ok(!self.installed_versions(token)?.is_empty())
    }

    /// Snapshots recorded for one version of `token`, latest first.
    pub fn snapshots(&self, token: &str, version: &str) -> Result<Vec<Snapshot>> {
        let version_meta = self.caskroom.metadata_version_dir(token, version);
        if !self.runtime.is_dir(&version_meta) {
            return Ok(vec![]);
        }

        let mut snapshots: Vec<Snapshot> = self
            .child_dir_names(&version_meta)?
            .into_iter()
            .map(|timestamp| Snapshot {
                path: self.caskroom.snapshot_file(token, version, &timestamp),
                version: version.to_string(),
                timestamp,
            })
            .collect();
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(snapshots)
    }

    /// Snapshots recorded for any version of `token`, latest first.
    pub fn all_snapshots(&self, token: &str) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        for (version, _) in self.timestamped_versions(token)? {
            for snapshot in self.snapshots(token, &version)? {
                if !snapshots.contains(&snapshot) {
                    snapshots.push(snapshot);
                }
            }
        }
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(snapshots)
    }

    /// Every token that has a root directory in the caskroom, sorted.
    pub fn tokens(&self) -> Result<Vec<String>> {
        if !self.runtime.exists(self.caskroom.root()) {
            return Ok(vec![]);
        }
        let mut tokens = self.child_dir_names(self.caskroom.root())?;
        tokens.sort();
        Ok(tokens)
    }

    /// `(version, timestamp)` pairs found under `.metadata`, unordered.
    fn timestamped_versions(&self, token: &str) -> Result<Vec<(String, String)>> {
        let metadata_dir = self.caskroom.metadata_dir(token);
        if !self.runtime.is_dir(&metadata_dir) {
            return Ok(vec![]);
        }

        let mut pairs = Vec::new();
        for version in self.child_dir_names(&metadata_dir)? {
            for timestamp in self.child_dir_names(&metadata_dir.join(&version))? {
                pairs.push((version.clone(), timestamp));
            }
        }
        Ok(pairs)
    }

    /// Names of non-hidden subdirectories of `dir`.
    fn child_dir_names(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in self.runtime.read_dir(dir)? {
            if let Some(name) = entry.file_name().and_then(|n| n.to_str())
                && !is_hidden(name)
                && self.runtime.is_dir(&entry)
            {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn make_snapshot_dir(root: &Path, token: &str, version: &str, timestamp: &str) {
        let caskroom = Caskroom::new(root);
        let file = caskroom.snapshot_file(token, version, timestamp);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, "{}").unwrap();
    }

    #[test]
    fn test_installed_versions_not_installed() {
        let mut runtime = MockRuntime::new();
        let token_dir = PathBuf::from("/opt/Caskroom/local-caffeine");

        runtime
            .expect_exists()
            .with(eq(token_dir))
            .returning(|_| false);

        let store = VersionStore::new(&runtime, Caskroom::new("/opt/Caskroom"));
        let versions = store.installed_versions("local-caffeine").unwrap();

        assert!(versions.is_empty());
    }

    #[test]
    fn test_installed_versions_from_directories_only() {
        let mut runtime = MockRuntime::new();
        let token_dir = PathBuf::from("/opt/Caskroom/tool");

        runtime
            .expect_exists()
            .with(eq(token_dir.clone()))
            .returning(|_| true);
        runtime
            .expect_is_dir()
            .with(eq(token_dir.join(".metadata")))
            .returning(|_| false);
        runtime
            .expect_read_dir()
            .with(eq(token_dir.clone()))
            .returning(|p| {
                Ok(vec![
                    p.join("2.0"),
                    p.join("1.0"),
                    p.join(".metadata"),
                    p.join("notes.txt"),
                ])
            });
        runtime
            .expect_is_dir()
            .with(eq(token_dir.join("2.0")))
            .returning(|_| true);
        runtime
            .expect_is_dir()
            .with(eq(token_dir.join("1.0")))
            .returning(|_| true);
        runtime
            .expect_is_dir()
            .with(eq(token_dir.join("notes.txt")))
            .returning(|_| false);

        let store = VersionStore::new(&runtime, Caskroom::new("/opt/Caskroom"));
        let versions = store.installed_versions("tool").unwrap();

        assert_eq!(versions, vec!["1.0".to_string(), "2.0".to_string()]);
    }

    #[test]
    fn test_installed_versions_ordered_by_timestamp() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        make_snapshot_dir(dir.path(), "versioned-cask", "4.5.6", "456000");
        make_snapshot_dir(dir.path(), "versioned-cask", "1.2.3", "123000");
        std::fs::create_dir_all(dir.path().join("versioned-cask/1.2.3")).unwrap();
        std::fs::create_dir_all(dir.path().join("versioned-cask/4.5.6")).unwrap();

        let store = VersionStore::new(&runtime, Caskroom::new(dir.path()));
        let versions = store.installed_versions("versioned-cask").unwrap();

        assert_eq!(versions, vec!["1.2.3".to_string(), "4.5.6".to_string()]);
        assert!(store.is_installed("versioned-cask").unwrap());
    }

    #[test]
    fn test_reinstalled_version_moves_to_its_latest_timestamp() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        make_snapshot_dir(dir.path(), "tool", "1.0", "100");
        make_snapshot_dir(dir.path(), "tool", "2.0", "200");
        make_snapshot_dir(dir.path(), "tool", "1.0", "300");

        let store = VersionStore::new(&runtime, Caskroom::new(dir.path()));
        let versions = store.installed_versions("tool").unwrap();

        assert_eq!(versions, vec!["2.0".to_string(), "1.0".to_string()]);
    }

    #[test]
    fn test_metadata_only_version_counts_as_installed() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        make_snapshot_dir(dir.path(), "ive-been-renamed", "latest", "timestamp");

        let store = VersionStore::new(&runtime, Caskroom::new(dir.path()));

        assert_eq!(
            store.installed_versions("ive-been-renamed").unwrap(),
            vec!["latest".to_string()]
        );
    }

    #[test]
    fn test_snapshots_latest_first() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        make_snapshot_dir(dir.path(), "tool", "1.0", "20240101000000.000");
        make_snapshot_dir(dir.path(), "tool", "1.0", "20240301000000.000");
        make_snapshot_dir(dir.path(), "tool", "2.0", "20240201000000.000");

        let store = VersionStore::new(&runtime, Caskroom::new(dir.path()));

        let snapshots = store.snapshots("tool", "1.0").unwrap();
        let stamps: Vec<_> = snapshots.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["20240301000000.000", "20240101000000.000"]);
        assert!(snapshots[0].path.ends_with("Casks/tool.json"));

        let all = store.all_snapshots("tool").unwrap();
        let stamps: Vec<_> = all.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(
            stamps,
            vec![
                "20240301000000.000",
                "20240201000000.000",
                "20240101000000.000"
            ]
        );

        assert!(store.snapshots("tool", "3.0").unwrap().is_empty());
    }

    #[test]
    fn test_tokens_skip_bookkeeping() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b-cask/1.0")).unwrap();
        std::fs::create_dir_all(dir.path().join("a-cask/1.0")).unwrap();
        std::fs::create_dir_all(dir.path().join(".locks")).unwrap();

        let store = VersionStore::new(&runtime, Caskroom::new(dir.path()));

        assert_eq!(
            store.tokens().unwrap(),
            vec!["a-cask".to_string(), "b-cask".to_string()]
        );
    }
}
