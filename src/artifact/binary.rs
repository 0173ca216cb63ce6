use std::path::Path;

use crate::error::CaskError;
use crate::runtime::Runtime;

use super::ArtifactContext;

/// Remove a binary symlink from the bindir.
///
/// The link is only removed when it still points into this cask's caskroom
/// directory, so a link since taken over by something else is left alone.
pub(super) fn remove<R: Runtime>(
    ctx: &ArtifactContext<'_, R>,
    source: &str,
    target: Option<&str>,
) -> Result<(), CaskError> {
    let name = match target {
        Some(target) => Path::new(target).file_name(),
        None => Path::new(source).file_name(),
    }
    .ok_or_else(|| {
        CaskError::action(ctx.token, format!("Binary '{}'", source), "invalid link name")
    })?;
    let link = ctx.bindir.join(name);

    let removed = ctx
        .runtime
        .remove_symlink_if_target_under(&link, &ctx.token_dir, "Binary")
        .map_err(|e| CaskError::action(ctx.token, format!("Binary {:?}", link), e))?;
    if removed {
        println!("Unlinked Binary {:?}", link);
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

    fn run(runtime: &MockRuntime, source: &str, target: Option<&str>) -> Result<(), CaskError> {
        let appdir = PathBuf::from("/Applications");
        let bindir = PathBuf::from("/usr/local/bin");
        let ctx = ArtifactContext {
            runtime,
            token: "tool",
            appdir: &appdir,
            bindir: &bindir,
            token_dir: PathBuf::from("/opt/Caskroom/tool"),
            version_dir: PathBuf::from("/opt/Caskroom/tool/1.0"),
            script_timeout: Duration::from_secs(1),
        };
        remove(&ctx, source, target)
    }

    #[test]
    fn test_link_named_after_target() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_remove_symlink_if_target_under()
            .with(
                eq(PathBuf::from("/usr/local/bin/tl")),
                eq(PathBuf::from("/opt/Caskroom/tool")),
                eq("Binary"),
            )
            .times(1)
            .returning(|_, _, _| Ok(true));

        run(&runtime, "tool-1.0/bin/tool", Some("tl")).unwrap();
    }

    #[test]
    fn test_link_named_after_source() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_remove_symlink_if_target_under()
            .with(
                eq(PathBuf::from("/usr/local/bin/tool")),
                eq(PathBuf::from("/opt/Caskroom/tool")),
                eq("Binary"),
            )
            .times(1)
            .returning(|_, _, _| Ok(false));

        run(&runtime, "tool-1.0/bin/tool", None).unwrap();
    }

    #[test]
    fn test_unlink_failure_is_an_action_error() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_remove_symlink_if_target_under()
            .returning(|_, _, _| Err(anyhow::anyhow!("Permission denied")));

        let err = run(&runtime, "bin/tool", None).unwrap_err();
        assert!(matches!(err, CaskError::Action { .. }));
    }
}
