//! Error kinds surfaced by the uninstall engine.

use std::path::PathBuf;

/// Failure of an uninstall invocation or of a single token within one.
#[derive(Debug, thiserror::Error)]
pub enum CaskError {
    /// No token was given, or an unrecognized option was passed.
    #[error("This command requires a Cask token.")]
    NoPackagesSpecified,

    /// The token does not name any known cask, live or installed.
    #[error("Cask '{token}' is unavailable: No Cask with this name exists.")]
    Unavailable { token: String },

    #[error("Cask '{token}' is not installed.")]
    NotInstalled { token: String },

    /// An installed version exists but no definition could be resolved for it.
    #[error("Cask '{token}' ({version}) has no usable definition: {reason}")]
    DefinitionUnavailable {
        token: String,
        version: String,
        reason: String,
    },

    #[error("Cask '{token}': {what} {path:?} does not exist.")]
    ArtifactMissing {
        token: String,
        what: String,
        path: PathBuf,
    },

    /// An artifact removal action failed for a reason other than absence.
    #[error("Cask '{token}': failed to remove {artifact}: {message}")]
    Action {
        token: String,
        artifact: String,
        message: String,
    },

    #[error("Cask '{token}' is being modified by another process (lock {path:?}).")]
    Locked { token: String, path: PathBuf },

    #[error("{} casks failed:\n{}", .0.len(), format_all(.0))]
    Multiple(Vec<CaskError>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaskError {
    /// Errors that abort the whole invocation before any token is processed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CaskError::NoPackagesSpecified | CaskError::Unavailable { .. }
        )
    }

    /// Build an [`CaskError::Action`] from any displayable failure.
    pub fn action(token: &str, artifact: impl Into<String>, err: impl std::fmt::Display) -> Self {
        CaskError::Action {
            token: token.to_string(),
            artifact: artifact.into(),
            message: format!("{:#}", err),
        }
    }
}

fn format_all(errors: &[CaskError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_missing_message() {
        let err = CaskError::ArtifactMissing {
            token: "with-uninstall-script-app".into(),
            what: "Uninstall script".into(),
            path: PathBuf::from("/Applications/MyFancyApp.app/uninstall.sh"),
        };
        let msg = err.to_string();
        assert!(msg.contains("does not exist"));
        assert!(msg.contains("with-uninstall-script-app"));
    }

    #[test]
    fn test_multiple_lists_each_failure() {
        let err = CaskError::Multiple(vec![
            CaskError::NotInstalled {
                token: "local-caffeine".into(),
            },
            CaskError::NotInstalled {
                token: "local-transmission".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 casks failed"));
        assert!(msg.contains("local-caffeine"));
        assert!(msg.contains("local-transmission"));
    }

    #[test]
    fn test_validation_kinds() {
        assert!(CaskError::NoPackagesSpecified.is_validation());
        assert!(CaskError::Unavailable { token: "x".into() }.is_validation());
        assert!(!CaskError::NotInstalled { token: "x".into() }.is_validation());
    }

    #[test]
    fn test_action_keeps_context_chain() {
        let source = anyhow::anyhow!("permission denied").context("Failed to remove directory");
        let err = CaskError::action("foo", "App 'Foo.app'", source);
        let msg = err.to_string();
        assert!(msg.contains("Failed to remove directory"));
        assert!(msg.contains("permission denied"));
    }
}
