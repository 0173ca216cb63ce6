use log::debug;
use std::path::Path;

use crate::error::CaskError;
use crate::runtime::Runtime;

use super::ArtifactContext;

/// Remove an application bundle from the appdir.
///
/// `source` is the bundle's path inside the staged download; only its file
/// name matters for where it was moved to.
pub(super) fn remove<R: Runtime>(
    ctx: &ArtifactContext<'_, R>,
    source: &str,
) -> Result<(), CaskError> {
    let name = Path::new(source).file_name().ok_or_else(|| {
        CaskError::action(ctx.token, format!("App '{}'", source), "invalid bundle path")
    })?;
    let target = ctx.appdir.join(name);
    debug!("Removing App {:?}", target);

    if ctx.remove_path(&target, "App")? {
        println!("Removed App {:?}", target);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;
    use std::time::Duration;

    fn context<'a>(
        runtime: &'a MockRuntime,
        appdir: &'a Path,
        bindir: &'a Path,
    ) -> ArtifactContext<'a, MockRuntime> {
        ArtifactContext {
            runtime,
            token: "local-caffeine",
            appdir,
            bindir,
            token_dir: PathBuf::from("/c/local-caffeine"),
            version_dir: PathBuf::from("/c/local-caffeine/1.2.3"),
            script_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_remove_uses_bundle_file_name() {
        let mut runtime = MockRuntime::new();
        let target = PathBuf::from("/Applications/Caffeine.app");

        runtime
            .expect_is_symlink()
            .with(eq(target.clone()))
            .returning(|_| false);
        runtime
            .expect_is_dir()
            .with(eq(target.clone()))
            .returning(|_| true);
        runtime
            .expect_remove_dir_all()
            .with(eq(target.clone()))
            .times(1)
            .returning(|_| Ok(()));

        let appdir = PathBuf::from("/Applications");
        let bindir = PathBuf::from("/usr/local/bin");
        let ctx = context(&runtime, &appdir, &bindir);

        remove(&ctx, "Caffeine/Caffeine.app").unwrap();
    }

    #[test]
    fn test_remove_failure_is_an_action_error() {
        let mut runtime = MockRuntime::new();

        runtime.expect_is_symlink().returning(|_| false);
        runtime.expect_is_dir().returning(|_| true);
        runtime
            .expect_remove_dir_all()
            .returning(|_| Err(anyhow::anyhow!("Operation not permitted")));

        let appdir = PathBuf::from("/Applications");
        let bindir = PathBuf::from("/usr/local/bin");
        let ctx = context(&runtime, &appdir, &bindir);

        let err = remove(&ctx, "Caffeine.app").unwrap_err();
        match err {
            CaskError::Action { token, message, .. } => {
                assert_eq!(token, "local-caffeine");
                assert!(message.contains("Operation not permitted"));
            }
            other => panic!("Expected Action error, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_rejects_empty_source() {
        let runtime = MockRuntime::new();
        let appdir = PathBuf::from("/Applications");
        let bindir = PathBuf::from("/usr/local/bin");
        let ctx = context(&runtime, &appdir, &bindir);

        assert!(remove(&ctx, "..").is_err());
    }
}
