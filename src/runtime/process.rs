//! Running package-supplied scripts.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::RealRuntime;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn run_command_impl(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<ExitStatus> {
        debug!("Running {:?} {:?} (timeout {:?})", program, args, timeout);
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to execute {:?}", program))?;

        // A timeout too large to represent means no deadline at all.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("Failed to wait for {:?}", program))?
            {
                debug!("{:?} exited with {}", program, status);
                return Ok(status);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!("{:?} timed out after {:?}, killing it", program, timeout);
                let _ = child.kill();
                let _ = child.wait();
                bail!("{:?} did not finish within {:?}", program, timeout);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}
