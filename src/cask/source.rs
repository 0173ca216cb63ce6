use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::caskroom::definition_file_name;
use crate::runtime::Runtime;

use super::{CaskSpec, LiveCask};

/// Where live cask definitions come from.
#[cfg_attr(test, mockall::automock)]
pub trait DefinitionSource {
    /// Load the current definition for `token`.
    ///
    /// Returns Ok(None) if the source does not know the token, Err if it does
    /// but the definition cannot be read.
    fn load(&self, token: &str) -> Result<Option<LiveCask>>;
}

/// A directory of `<token>.json` definition files.
pub struct TapDirectory<'a, R: Runtime> {
    runtime: &'a R,
    dir: PathBuf,
}

impl<'a, R: Runtime> TapDirectory<'a, R> {
    pub fn new(runtime: &'a R, dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            dir: dir.into(),
        }
    }

    pub fn definition_path(&self, token: &str) -> PathBuf {
        self.dir.join(definition_file_name(token))
    }
}

impl<R: Runtime> DefinitionSource for TapDirectory<'_, R> {
    #[tracing::instrument(skip(self))]
    fn load(&self, token: &str) -> Result<Option<LiveCask>> {
        let path = self.definition_path(token);
        if !self.runtime.exists(&path) {
            debug!("No live definition for {} at {:?}", token, path);
            return Ok(None);
        }
        let spec = CaskSpec::load(self.runtime, &path)?;
        Ok(Some(LiveCask::new(spec, path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cask::Cask;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    #[test]
    fn test_load_missing_definition() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/taps/notacask.json")))
            .returning(|_| false);

        let tap = TapDirectory::new(&runtime, "/taps");
        assert!(tap.load("notacask").unwrap().is_none());
    }

    #[test]
    fn test_load_definition() {
        let mut runtime = MockRuntime::new();
        let path = PathBuf::from("/taps/local-caffeine.json");
        runtime
            .expect_exists()
            .with(eq(path.clone()))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .returning(|_| {
                Ok(r#"{"token": "local-caffeine", "version": "1.2.3",
                       "artifacts": [{"app": "Caffeine.app"}]}"#
                    .to_string())
            });

        let tap = TapDirectory::new(&runtime, "/taps");
        let cask = tap.load("local-caffeine").unwrap().unwrap();

        assert_eq!(cask.token(), "local-caffeine");
        assert_eq!(cask.version(), "1.2.3");
        assert_eq!(cask.origin(), path.as_path());
    }

    #[test]
    fn test_load_broken_definition_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("not json".to_string()));

        let tap = TapDirectory::new(&runtime, "/taps");
        assert!(tap.load("broken").is_err());
    }
}
