//! Command entry points invoked by the CLI.

mod list;
mod uninstall;

pub use list::list;
pub use uninstall::{
    TokenOutcome, UninstallReport, UninstallRequest, Uninstalled, Uninstaller, remaining_message,
    uninstall,
};
