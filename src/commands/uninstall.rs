use log::{debug, info, warn};

use crate::artifact::{ArtifactUninstaller, UninstallOptions};
use crate::cask::{DefinitionResolver, DefinitionSource, TapDirectory};
use crate::caskroom::{Pruner, TokenLock, VersionStore};
use crate::config::Config;
use crate::error::CaskError;
use crate::runtime::Runtime;

/// Parsed `uninstall` arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct UninstallRequest {
    pub tokens: Vec<String>,
    pub force: bool,
}

impl UninstallRequest {
    /// Accepts `--force`/`-f` and tokens. Any other option, or no token at
    /// all, is rejected as [`CaskError::NoPackagesSpecified`].
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, CaskError> {
        let mut tokens = Vec::new();
        let mut force = false;

        for arg in args.iter().map(AsRef::as_ref) {
            match arg {
                "--force" | "-f" => force = true,
                option if option.starts_with('-') => {
                    warn!("Unrecognized option '{}'", option);
                    return Err(CaskError::NoPackagesSpecified);
                }
                token => tokens.push(token.to_string()),
            }
        }

        if tokens.is_empty() {
            return Err(CaskError::NoPackagesSpecified);
        }
        Ok(Self { tokens, force })
    }
}

/// What happened to one token that was processed successfully.
#[derive(Debug)]
pub struct Uninstalled {
    pub token: String,
    /// The version removed, or None when nothing was installed and only
    /// leftovers were cleaned up under force.
    pub version: Option<String>,
    /// Versions still installed afterwards, oldest first.
    pub remaining: Vec<String>,
    /// Failures tolerated because of force.
    pub warnings: Vec<CaskError>,
}

#[derive(Debug)]
pub struct TokenOutcome {
    pub token: String,
    pub result: Result<Uninstalled, CaskError>,
}

/// Per-token outcomes of one invocation, in request order.
#[derive(Debug, Default)]
pub struct UninstallReport {
    pub outcomes: Vec<TokenOutcome>,
}

impl UninstallReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Collapse into a single result: the failure itself when exactly one
    /// token failed, [`CaskError::Multiple`] when several did.
    pub fn into_result(self) -> Result<(), CaskError> {
        let mut errors: Vec<CaskError> = self
            .outcomes
            .into_iter()
            .filter_map(|o| o.result.err())
            .collect();
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(CaskError::Multiple(errors)),
        }
    }
}

/// Drives the per-token stages: lock, select version, resolve, remove
/// artifacts, prune.
pub struct Uninstaller<'a, R: Runtime, S: DefinitionSource> {
    runtime: &'a R,
    source: &'a S,
    config: &'a Config,
    store: VersionStore<'a, R>,
}

impl<'a, R: Runtime, S: DefinitionSource> Uninstaller<'a, R, S> {
    pub fn new(runtime: &'a R, source: &'a S, config: &'a Config) -> Self {
        Self {
            runtime,
            source,
            config,
            store: VersionStore::new(runtime, config.caskroom()),
        }
    }

    /// Process every requested token.
    ///
    /// Fails as a whole only when a token names no cask at all; nothing is
    /// touched in that case. Any other failure is scoped to its token and
    /// recorded in the report.
    #[tracing::instrument(skip(self))]
    pub fn run(&self, request: &UninstallRequest) -> Result<UninstallReport, CaskError> {
        let resolver = self.resolver();
        if let Some(unknown) = request.tokens.iter().find(|t| !resolver.is_nameable(t)) {
            return Err(CaskError::Unavailable {
                token: unknown.clone(),
            });
        }

        let mut report = UninstallReport::default();
        for token in &request.tokens {
            let result = self.uninstall_token(token, request.force);
            match &result {
                Ok(done) => print_outcome(done),
                Err(e) => debug!("Uninstalling {} failed: {}", token, e),
            }
            report.outcomes.push(TokenOutcome {
                token: token.clone(),
                result,
            });
        }
        Ok(report)
    }

    /// Uninstall the oldest installed version of `token`.
    #[tracing::instrument(skip(self))]
    pub fn uninstall_token(&self, token: &str, force: bool) -> Result<Uninstalled, CaskError> {
        // Checked before locking so a plain not-installed leaves no trace.
        if !force && !self.store.is_installed(token)? {
            return Err(CaskError::NotInstalled {
                token: token.to_string(),
            });
        }

        // A forced token that was never installed has nothing to guard, and
        // locking it would create the caskroom.
        let caskroom = self.store.caskroom();
        let _lock = if self.runtime.is_dir(&caskroom.token_dir(token)) {
            Some(TokenLock::acquire(self.runtime, caskroom, token)?)
        } else {
            None
        };

        let versions = self.store.installed_versions(token)?;
        debug!("Installed versions of {}: {:?}", token, versions);
        match versions.first() {
            Some(version) => self.uninstall_version(token, version, force),
            None if force => self.clean_leftovers(token),
            None => Err(CaskError::NotInstalled {
                token: token.to_string(),
            }),
        }
    }

    fn uninstall_version(
        &self,
        token: &str,
        version: &str,
        force: bool,
    ) -> Result<Uninstalled, CaskError> {
        info!("Uninstalling {} {}", token, version);
        let cask = self.resolver().resolve(token, version)?;

        let warnings = ArtifactUninstaller::new(self.runtime, self.config)
            .uninstall(cask.as_ref(), UninstallOptions { force })?;

        let remaining = Pruner::new(self.runtime, &self.store).prune(token, version)?;
        Ok(Uninstalled {
            token: token.to_string(),
            version: Some(version.to_string()),
            remaining,
            warnings,
        })
    }

    /// Best-effort cleanup for a forced uninstall of something not installed.
    fn clean_leftovers(&self, token: &str) -> Result<Uninstalled, CaskError> {
        info!("{} is not installed, removing leftovers", token);
        let warnings = match self.resolver().resolve_any(token) {
            Ok(cask) => ArtifactUninstaller::new(self.runtime, self.config)
                .uninstall(cask.as_ref(), UninstallOptions { force: true })?,
            Err(e) => {
                warn!("No definition to clean up {} with: {}", token, e);
                vec![e]
            }
        };

        Pruner::new(self.runtime, &self.store).prune_token_if_empty(token)?;
        Ok(Uninstalled {
            token: token.to_string(),
            version: None,
            remaining: vec![],
            warnings,
        })
    }

    fn resolver(&self) -> DefinitionResolver<'_, R, S> {
        DefinitionResolver::new(self.runtime, self.source, &self.store)
    }
}

fn print_outcome(done: &Uninstalled) {
    for warning in &done.warnings {
        eprintln!("Warning: {}", warning);
    }

    match &done.version {
        Some(version) => println!("Uninstalled {} ({})", done.token, version),
        None => println!("Cask '{}' was not installed, cleaned up what remained.", done.token),
    }

    if let Some(message) = remaining_message(&done.token, &done.remaining) {
        println!("{}", message);
    }
}

/// Notice shown when other versions of `token` are still installed.
pub fn remaining_message(token: &str, remaining: &[String]) -> Option<String> {
    if remaining.is_empty() {
        return None;
    }
    let (verb, which) = if remaining.len() == 1 {
        ("is", "it")
    } else {
        ("are", "the next one")
    };
    Some(format!(
        "{} {} {} still installed.\nRun `caskr uninstall {}` again to remove {}.",
        token,
        remaining.join(", "),
        verb,
        token,
        which
    ))
}

/// Uninstall the casks named in `args` using the definitions in the
/// configured casks directory.
#[tracing::instrument(skip(runtime, config))]
pub fn uninstall<R: Runtime>(runtime: R, args: &[String], config: Config) -> Result<(), CaskError> {
    let request = UninstallRequest::from_args(args)?;
    debug!("Uninstall request: {:?}", request);
    debug!("Using caskroom: {:?}", config.caskroom);

    let source = TapDirectory::new(&runtime, &config.casks_dir);
    let uninstaller = Uninstaller::new(&runtime, &source, &config);
    uninstaller.run(&request)?.into_result()
}
