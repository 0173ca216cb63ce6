//! Symlink operations (inspect, remove).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::RealRuntime;
use super::path::is_path_under;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_link_impl(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).context("Failed to read symlink")
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_impl(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::remove_file(path).context("Failed to remove symlink")?;
        }
        #[cfg(windows)]
        {
            // Directory symlinks need remove_dir on Windows.
            fs::remove_dir(path)
                .or_else(|_| fs::remove_file(path))
                .context("Failed to remove symlink")?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_if_target_under_impl(
        &self,
        link_path: &Path,
        target_prefix: &Path,
        description: &str,
    ) -> Result<bool> {
        if !self.is_symlink_impl(link_path) {
            if self.exists_impl(link_path) {
                eprintln!(
                    "Warning: {} {:?} exists but is not a symlink, skipping",
                    description, link_path
                );
            } else {
                debug!("{} {:?} does not exist, skipping", description, link_path);
            }
            return Ok(false);
        }

        let target = match self.read_link_impl(link_path) {
            Ok(target) => target,
            Err(e) => {
                eprintln!(
                    "Warning: {} {:?} is a symlink but cannot read its target: {}, skipping",
                    description, link_path, e
                );
                return Ok(false);
            }
        };

        let resolved_target = if target.is_relative() {
            link_path.parent().unwrap_or(Path::new(".")).join(&target)
        } else {
            target.clone()
        };
        let canonical_target =
            fs::canonicalize(&resolved_target).unwrap_or_else(|_| resolved_target.clone());
        let canonical_prefix =
            fs::canonicalize(target_prefix).unwrap_or_else(|_| target_prefix.to_path_buf());

        debug!(
            "{} {:?} points to {:?} (canonical: {:?})",
            description, link_path, target, canonical_target
        );

        if !is_path_under(&canonical_target, &canonical_prefix) {
            eprintln!(
                "Warning: {} {:?} points to {:?} which is not within {:?}, skipping removal",
                description, link_path, canonical_target, canonical_prefix
            );
            return Ok(false);
        }

        self.remove_symlink_impl(link_path).map_err(|e| {
            warn!("Failed to remove {} {:?}: {}", description, link_path, e);
            e
        })?;
        Ok(true)
    }
}
