//! The `uninstall` directive: a package-supplied cleanup routine.

use log::info;

use crate::cask::UninstallScript;
use crate::error::CaskError;
use crate::runtime::Runtime;

use super::ArtifactContext;

/// Run the uninstall script with the invoking user's privileges.
pub(super) fn run_script<R: Runtime>(
    ctx: &ArtifactContext<'_, R>,
    script: &UninstallScript,
) -> Result<(), CaskError> {
    let executable = ctx.expand_path(&script.executable, "Uninstall script")?;
    if !ctx.runtime.exists(&executable) {
        return Err(CaskError::ArtifactMissing {
            token: ctx.token.to_string(),
            what: "Uninstall script".to_string(),
            path: executable,
        });
    }

    let what = format!("uninstall script {:?}", executable);
    println!("Running {}", what);
    let status = ctx
        .runtime
        .run_command(&executable, &script.args, ctx.script_timeout)
        .map_err(|e| CaskError::action(ctx.token, what.as_str(), e))?;
    if !status.success() {
        return Err(CaskError::action(
            ctx.token,
            what.as_str(),
            format!("exited with {}", status),
        ));
    }
    info!("{} finished", what);
    Ok(())
}

/// Delete one path listed by the directive; absence is not an error.
pub(super) fn delete<R: Runtime>(ctx: &ArtifactContext<'_, R>, raw: &str) -> Result<(), CaskError> {
    let path = ctx.expand_path(raw, "Path")?;
    if ctx.remove_path(&path, "Path")? {
        println!("Removed {:?}", path);
    }
    Ok(())
}
