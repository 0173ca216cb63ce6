//! Cask definitions
//!
//! This module covers everything about *what* a cask declares: the definition
//! document format, the live definition source, and the resolver that falls
//! back to install-time snapshots.

mod definition;
mod resolver;
mod source;
mod spec;

pub use definition::{Cask, LiveCask, SnapshotCask};
pub use resolver::DefinitionResolver;
pub use source::{DefinitionSource, TapDirectory};
pub use spec::{Artifact, CaskSpec, UninstallDirective, UninstallScript};

#[cfg(test)]
pub use source::MockDefinitionSource;

/// Tokens must be a single, visible path component.
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && !token.starts_with('.')
        && !token.contains(['/', '\\'])
        && !token.chars().any(char::is_whitespace)
}
