//! Artifact uninstaller dispatch.
//!
//! Removal runs in two fixed stages: every `uninstall` directive (the cleanup
//! routine) first, then every other artifact in declared order. Artifacts that
//! are already gone are skipped silently. With `force`, failures are collected
//! and reported instead of aborting.

mod app;
mod binary;
mod uninstall;

use log::{debug, warn};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::cask::{Artifact, Cask};
use crate::config::Config;
use crate::error::CaskError;
use crate::runtime::Runtime;
use crate::runtime::path::expand_placeholders;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UninstallOptions {
    pub force: bool,
}

/// Everything an artifact removal action may need.
pub(crate) struct ArtifactContext<'a, R: Runtime> {
    pub runtime: &'a R,
    pub token: &'a str,
    pub appdir: &'a Path,
    pub bindir: &'a Path,
    pub token_dir: PathBuf,
    pub version_dir: PathBuf,
    pub script_timeout: Duration,
}

impl<R: Runtime> ArtifactContext<'_, R> {
    /// Expand `{appdir}`, `{bindir}` and `{version_dir}` in a definition path.
    pub fn expand(&self, raw: &str) -> PathBuf {
        expand_placeholders(
            raw,
            &[
                ("appdir", self.appdir),
                ("bindir", self.bindir),
                ("version_dir", self.version_dir.as_path()),
            ],
        )
    }

    /// Expand `raw` and refuse anything that is not a plain absolute path
    /// below the filesystem root.
    pub fn expand_path(&self, raw: &str, what: &str) -> Result<PathBuf, CaskError> {
        let path = self.expand(raw);
        let problem = if !path.is_absolute() {
            "is not an absolute path"
        } else if path.components().any(|c| c == Component::ParentDir) {
            "must not contain '..'"
        } else if path.parent().is_none() {
            "is the filesystem root"
        } else {
            return Ok(path);
        };
        Err(CaskError::action(
            self.token,
            format!("{} {:?}", what, raw),
            format!("{:?} {}", path, problem),
        ))
    }

    /// Remove whatever is at `path`; absence is not an error.
    /// Returns true if something was removed.
    pub fn remove_path(&self, path: &Path, what: &str) -> Result<bool, CaskError> {
        let result = if self.runtime.is_symlink(path) {
            self.runtime.remove_symlink(path)
        } else if self.runtime.is_dir(path) {
            self.runtime.remove_dir_all(path)
        } else if self.runtime.exists(path) {
            self.runtime.remove_file(path)
        } else {
            debug!("{} {:?} is already gone", what, path);
            return Ok(false);
        };
        result.map_err(|e| CaskError::action(self.token, format!("{} {:?}", what, path), e))?;
        Ok(true)
    }
}

/// Runs the removal actions a cask declares.
pub struct ArtifactUninstaller<'a, R: Runtime> {
    runtime: &'a R,
    config: &'a Config,
}

impl<'a, R: Runtime> ArtifactUninstaller<'a, R> {
    pub fn new(runtime: &'a R, config: &'a Config) -> Self {
        Self { runtime, config }
    }

    /// Remove every artifact of `cask`.
    ///
    /// Returns the failures tolerated because of `force`; without `force` the
    /// first failure is returned as the error.
    #[tracing::instrument(skip(self, cask), fields(token = cask.token(), version = cask.version()))]
    pub fn uninstall(
        &self,
        cask: &dyn Cask,
        options: UninstallOptions,
    ) -> Result<Vec<CaskError>, CaskError> {
        let caskroom = self.config.caskroom();
        let ctx = ArtifactContext {
            runtime: self.runtime,
            token: cask.token(),
            appdir: &self.config.appdir,
            bindir: &self.config.bindir,
            token_dir: caskroom.token_dir(cask.token()),
            version_dir: caskroom.version_dir(cask.token(), cask.version()),
            script_timeout: self.config.script_timeout,
        };
        debug!(
            "Uninstalling artifacts of {} {} from {:?}",
            cask.token(),
            cask.version(),
            cask.origin()
        );

        let mut tolerated = Vec::new();

        // Stage 1: cleanup routines.
        for artifact in cask.artifacts().iter().filter(|a| a.is_cleanup()) {
            if let Artifact::Uninstall(directive) = artifact {
                let script = match &directive.script {
                    Some(script) => uninstall::run_script(&ctx, script),
                    None => Ok(()),
                };
                Self::settle(script, options, &mut tolerated)?;
                for raw in &directive.delete {
                    Self::settle(uninstall::delete(&ctx, raw), options, &mut tolerated)?;
                }
            }
        }

        // Stage 2: artifacts.
        for artifact in cask.artifacts().iter().filter(|a| !a.is_cleanup()) {
            let result = match artifact {
                Artifact::App(source) => app::remove(&ctx, source),
                Artifact::Binary { source, target } => {
                    binary::remove(&ctx, source, target.as_deref())
                }
                Artifact::Uninstall(_) => Ok(()),
            };
            Self::settle(result, options, &mut tolerated)?;
        }

        Ok(tolerated)
    }

    /// Apply the force policy to one action's result.
    fn settle(
        result: Result<(), CaskError>,
        options: UninstallOptions,
        tolerated: &mut Vec<CaskError>,
    ) -> Result<(), CaskError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if options.force => {
                warn!("Ignoring failure because of --force: {}", e);
                tolerated.push(e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
