use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::runtime::Runtime;

/// A cask definition document as stored in a tap or a metadata snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CaskSpec {
    pub token: String,
    pub version: String,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl CaskSpec {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime.read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cask definition {:?}", path))
    }
}

/// One artifact declared by a cask.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    /// An application bundle moved into the appdir.
    App(String),
    /// A symlink in the bindir pointing into the staged version directory.
    Binary {
        source: String,
        #[serde(default)]
        target: Option<String>,
    },
    /// Cleanup routine run before any other artifact is removed.
    Uninstall(UninstallDirective),
}

impl Artifact {
    pub fn is_cleanup(&self) -> bool {
        matches!(self, Artifact::Uninstall(_))
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::App(source) => write!(f, "App '{}'", source),
            Artifact::Binary { source, .. } => write!(f, "Binary '{}'", source),
            Artifact::Uninstall(_) => write!(f, "uninstall directive"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct UninstallDirective {
    #[serde(default)]
    pub script: Option<UninstallScript>,
    /// Paths deleted after the script ran; may use `{appdir}` style placeholders.
    #[serde(default)]
    pub delete: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UninstallScript {
    pub executable: String,
    #[serde(default)]
    pub args: Vec<String>,
}
