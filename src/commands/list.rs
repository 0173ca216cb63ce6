use anyhow::Result;
use log::debug;

use crate::caskroom::VersionStore;
use crate::config::Config;
use crate::runtime::Runtime;

/// List all installed casks with their versions, oldest install first.
#[tracing::instrument(skip(runtime, config))]
pub fn list<R: Runtime>(runtime: R, config: Config) -> Result<()> {
    debug!("Listing casks from {:?}", config.caskroom);

    let store = VersionStore::new(&runtime, config.caskroom());
    let installed = installed_casks(&store)?;
    if installed.is_empty() {
        println!("No casks installed.");
        return Ok(());
    }

    for (token, versions) in installed {
        println!("{} {}", token, versions.join(" "));
    }
    Ok(())
}

/// Tokens that have at least one installed version.
fn installed_casks<R: Runtime>(store: &VersionStore<'_, R>) -> Result<Vec<(String, Vec<String>)>> {
    let mut installed = Vec::new();
    for token in store.tokens()? {
        let versions = store.installed_versions(&token)?;
        if versions.is_empty() {
            debug!("Skipping {}: no versions installed", token);
            continue;
        }
        installed.push((token, versions));
    }
    Ok(installed)
}
