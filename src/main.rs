use anyhow::Result;
use clap::Parser;
use caskr::config::{Config, ConfigOverrides};
use caskr::runtime::RealRuntime;
use std::path::PathBuf;

/// caskr - Cask uninstaller
///
/// Remove installed casks: runs each cask's uninstall routine, removes its
/// artifacts, and prunes its entry from the caskroom.
///
/// Examples:
///   caskr uninstall local-caffeine          # Remove the oldest installed version
///   caskr uninstall --force local-caffeine  # Keep going past missing artifacts
///   caskr list                              # Show installed casks
#[derive(Parser, Debug)]
#[command(author, version = env!("CASKR_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Caskroom directory (also via CASKR_CASKROOM)
    #[arg(long, global = true, env = "CASKR_CASKROOM", value_name = "PATH")]
    pub caskroom: Option<PathBuf>,

    /// Directory applications are installed into (also via CASKR_APPDIR)
    #[arg(long, global = true, env = "CASKR_APPDIR", value_name = "PATH")]
    pub appdir: Option<PathBuf>,

    /// Directory binaries are linked into (also via CASKR_BINDIR)
    #[arg(long, global = true, env = "CASKR_BINDIR", value_name = "PATH")]
    pub bindir: Option<PathBuf>,

    /// Directory of live cask definitions (also via CASKR_CASKS)
    #[arg(long = "casks", global = true, env = "CASKR_CASKS", value_name = "PATH")]
    pub casks_dir: Option<PathBuf>,

    /// Seconds an uninstall script may run before it is killed
    #[arg(long, global = true, env = "CASKR_SCRIPT_TIMEOUT", value_name = "SECS")]
    pub script_timeout: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Uninstall casks: uninstall [--force|-f] <TOKEN>...
    Uninstall(UninstallArgs),

    /// List installed casks and their versions
    List,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {
    /// Cask tokens, optionally with --force. Global options are only
    /// recognized before the first token; everything from there on is
    /// passed through as is.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            caskroom: self.caskroom.clone(),
            appdir: self.appdir.clone(),
            bindir: self.bindir.clone(),
            casks_dir: self.casks_dir.clone(),
            script_timeout_secs: self.script_timeout,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let config = Config::new(&runtime, cli.overrides())?;

    match cli.command {
        Commands::Uninstall(args) => caskr::commands::uninstall(runtime, &args.args, config)?,
        Commands::List => caskr::commands::list(runtime, config)?,
    }
    Ok(())
}
