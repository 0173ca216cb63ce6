use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::caskroom::Caskroom;
use crate::runtime::Runtime;

/// Default upper bound on how long a package-supplied script may run.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(300);

/// Locations and limits every component works against.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub caskroom: PathBuf,
    pub appdir: PathBuf,
    pub bindir: PathBuf,
    /// Directory holding live `<token>.json` definitions.
    pub casks_dir: PathBuf,
    pub script_timeout: Duration,
}

/// Values given explicitly on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub caskroom: Option<PathBuf>,
    pub appdir: Option<PathBuf>,
    pub bindir: Option<PathBuf>,
    pub casks_dir: Option<PathBuf>,
    pub script_timeout_secs: Option<u64>,
}

impl Config {
    /// Build the configuration, filling anything not overridden with the
    /// defaults for the current user.
    #[tracing::instrument(skip(runtime))]
    pub fn new<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<Self> {
        let defaults = Self::defaults(runtime)?;
        let config = Self {
            caskroom: overrides.caskroom.unwrap_or(defaults.caskroom),
            appdir: overrides.appdir.unwrap_or(defaults.appdir),
            bindir: overrides.bindir.unwrap_or(defaults.bindir),
            casks_dir: overrides.casks_dir.unwrap_or(defaults.casks_dir),
            script_timeout: overrides
                .script_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.script_timeout),
        };
        debug!("Using configuration {:?}", config);
        Ok(config)
    }

    /// System-wide locations when privileged, otherwise per-user ones.
    pub fn defaults<R: Runtime>(runtime: &R) -> Result<Self> {
        if runtime.is_privileged() {
            return Ok(Self {
                caskroom: PathBuf::from("/usr/local/Caskroom"),
                appdir: PathBuf::from("/Applications"),
                bindir: PathBuf::from("/usr/local/bin"),
                casks_dir: PathBuf::from("/usr/local/share/caskr/Casks"),
                script_timeout: DEFAULT_SCRIPT_TIMEOUT,
            });
        }

        let home = runtime
            .home_dir()
            .context("Could not find home directory")?;
        let base = home.join(".caskr");
        Ok(Self {
            caskroom: base.join("Caskroom"),
            appdir: home.join("Applications"),
            bindir: base.join("bin"),
            casks_dir: base.join("Casks"),
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
        })
    }

    /// Every location under one root, for tests.
    pub fn for_test(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            caskroom: root.join("Caskroom"),
            appdir: root.join("Applications"),
            bindir: root.join("bin"),
            casks_dir: root.join("Casks"),
            script_timeout: Duration::from_secs(30),
        }
    }

    pub fn caskroom(&self) -> Caskroom {
        Caskroom::new(&self.caskroom)
    }
}
