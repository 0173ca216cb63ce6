//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over system operations,
//! enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `path` - Path utility functions (normalize, is_path_under)
//! - `env` - Home directory and privilege checks
//! - `fs` - File system operations (read, directory, lock files)
//! - `symlink` - Symlink operations (inspect, remove)
//! - `process` - Running package-supplied scripts with a timeout

mod env;
mod fs;
pub mod path;
mod process;
mod symlink;

use anyhow::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

pub use path::is_path_under;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Open (creating if needed) `path` and take an exclusive advisory lock on it.
    /// Returns Ok(None) if another open handle holds the lock. The lock is
    /// released when the returned file is dropped or the process exits.
    fn try_lock_exclusive(&self, path: &Path) -> Result<Option<File>>;

    // Symlinks
    fn is_symlink(&self, path: &Path) -> bool;
    fn remove_symlink(&self, path: &Path) -> Result<()>;

    /// Remove a symlink if its target is under the given prefix directory.
    /// The prefix is checked by directory components, not string prefix.
    /// Returns Ok(true) if removed, Ok(false) if skipped, Err if operation failed.
    fn remove_symlink_if_target_under(
        &self,
        link_path: &Path,
        target_prefix: &Path,
        description: &str,
    ) -> Result<bool>;

    // Processes
    /// Run `program` with `args`, killing it once `timeout` elapses.
    fn run_command(&self, program: &Path, args: &[String], timeout: Duration)
    -> Result<ExitStatus>;

    // Directories
    fn home_dir(&self) -> Option<PathBuf>;

    // Privilege
    fn is_privileged(&self) -> bool;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        self.remove_dir_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn try_lock_exclusive(&self, path: &Path) -> Result<Option<File>> {
        self.try_lock_exclusive_impl(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.is_symlink_impl(path)
    }

    fn remove_symlink(&self, path: &Path) -> Result<()> {
        self.remove_symlink_impl(path)
    }

    fn remove_symlink_if_target_under(
        &self,
        link_path: &Path,
        target_prefix: &Path,
        description: &str,
    ) -> Result<bool> {
        self.remove_symlink_if_target_under_impl(link_path, target_prefix, description)
    }

    fn run_command(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<ExitStatus> {
        self.run_command_impl(program, args, timeout)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir_impl()
    }

    fn is_privileged(&self) -> bool {
        self.is_privileged_impl()
    }
}
