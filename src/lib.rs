pub mod artifact;
pub mod cask;
pub mod caskroom;
pub mod commands;
pub mod config;
pub mod error;
pub mod runtime;

pub use error::CaskError;

/// Test utilities shared by unit tests.
#[cfg(test)]
pub mod test_utils {
    use crate::runtime::MockRuntime;
    use std::path::PathBuf;

    /// Returns a test home directory path based on the platform.
    /// - Unix: `/home/user`
    /// - Windows: `C:\Users\user`
    pub fn test_home() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user")
        }
    }

    /// Configure a mock runtime with common defaults for tests.
    /// - home dir set to [`test_home`]
    /// - not privileged
    pub fn configure_mock_runtime_basics(runtime: &mut MockRuntime) {
        runtime.expect_home_dir().returning(|| Some(test_home()));

        runtime.expect_is_privileged().returning(|| false);
    }
}
