//! Picks the definition to trust when uninstalling a cask.
//!
//! The live definition is preferred when it still describes the installed
//! version. Otherwise the definition saved at install time is used, which is
//! the only way to undo installs of casks renamed or removed upstream.

use log::{debug, warn};

use crate::caskroom::{Snapshot, VersionStore};
use crate::error::CaskError;
use crate::runtime::Runtime;

use super::{Cask, CaskSpec, DefinitionSource, LiveCask, SnapshotCask, is_valid_token};

pub struct DefinitionResolver<'a, R: Runtime, S: DefinitionSource> {
    runtime: &'a R,
    source: &'a S,
    store: &'a VersionStore<'a, R>,
}

impl<'a, R: Runtime, S: DefinitionSource> DefinitionResolver<'a, R, S> {
    pub fn new(runtime: &'a R, source: &'a S, store: &'a VersionStore<'a, R>) -> Self {
        Self {
            runtime,
            source,
            store,
        }
    }

    /// Whether `token` names a cask at all: the live source knows it, or the
    /// caskroom still has a directory for it.
    pub fn is_nameable(&self, token: &str) -> bool {
        if !is_valid_token(token) {
            return false;
        }
        match self.source.load(token) {
            Ok(Some(_)) | Err(_) => true,
            Ok(None) => self
                .runtime
                .is_dir(&self.store.caskroom().token_dir(token)),
        }
    }

    /// Definition for the installed `version` of `token`.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, token: &str, version: &str) -> Result<Box<dyn Cask>, CaskError> {
        if let Some(live) = self.load_live(token) {
            if live.version() == version {
                debug!("Using live definition {:?}", live.origin());
                return Ok(Box::new(live));
            }
            debug!(
                "Live definition of {} is version {}, installed is {}",
                token,
                live.version(),
                version
            );
        }

        let snapshots = self.store.snapshots(token, version)?;
        self.first_usable_snapshot(token, version, snapshots)
    }

    /// Best definition regardless of what is installed: live first, else the
    /// newest snapshot of any version.
    #[tracing::instrument(skip(self))]
    pub fn resolve_any(&self, token: &str) -> Result<Box<dyn Cask>, CaskError> {
        if let Some(live) = self.load_live(token) {
            return Ok(Box::new(live));
        }
        let snapshots = self.store.all_snapshots(token)?;
        self.first_usable_snapshot(token, "any version", snapshots)
    }

    fn load_live(&self, token: &str) -> Option<LiveCask> {
        match self.source.load(token) {
            Ok(Some(live)) if live.token() == token => Some(live),
            Ok(Some(live)) => {
                warn!(
                    "Live definition {:?} declares token '{}', expected '{}'",
                    live.origin(),
                    live.token(),
                    token
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to load live definition of {}: {:#}", token, e);
                None
            }
        }
    }

    /// Parse snapshots (latest first) until one yields a definition for `token`.
    fn first_usable_snapshot(
        &self,
        token: &str,
        version: &str,
        snapshots: Vec<Snapshot>,
    ) -> Result<Box<dyn Cask>, CaskError> {
        let mut reason = "no saved definition found".to_string();

        for snapshot in snapshots {
            match CaskSpec::load(self.runtime, &snapshot.path) {
                Ok(spec) if spec.token == token => {
                    debug!("Using saved definition {:?}", snapshot.path);
                    return Ok(Box::new(SnapshotCask::new(spec, snapshot)));
                }
                Ok(spec) => {
                    warn!(
                        "Saved definition {:?} declares token '{}', skipping",
                        snapshot.path, spec.token
                    );
                    reason = format!("saved definition declares token '{}'", spec.token);
                }
                Err(e) => {
                    warn!("Skipping saved definition {:?}: {:#}", snapshot.path, e);
                    reason = format!("{:#}", e);
                }
            }
        }

        Err(CaskError::DefinitionUnavailable {
            token: token.to_string(),
            version: version.to_string(),
            reason,
        })
    }
}
