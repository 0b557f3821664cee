use super::{AppConfig, MAX_TIMEOUT_SECS};
use crate::db::DeviceId;
use anyhow::{bail, Context, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before any capture starts.
    pub fn validate(&self) -> Result<()> {
        let remote = self.remote.trim();
        if remote.is_empty() {
            bail!("--remote must not be empty");
        }
        if remote.contains(['/', '\\']) || remote.contains(char::is_whitespace) {
            bail!("--remote must not contain path separators or whitespace, got '{remote}'");
        }

        // Fail on a malformed remote name up front, not after a whole
        // capture session when the lookup rows are about to be written.
        if self.database.is_some() {
            DeviceId::from_remote(remote)?;
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS {
            bail!(
                "--timeout-secs must be at most {MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            );
        }

        if self.lirc_device.trim().is_empty() {
            bail!("--lirc-device must not be empty");
        }

        self.mode2_argv()?;
        Ok(())
    }

    /// The capture utility command line, split shell-style.
    pub fn mode2_argv(&self) -> Result<Vec<String>> {
        let argv = shell_words::split(&self.mode2_cmd)
            .with_context(|| format!("failed to parse --mode2-cmd '{}'", self.mode2_cmd))?;
        if argv.is_empty() {
            bail!("--mode2-cmd must not be empty");
        }
        Ok(argv)
    }

    /// Capture timeout as a duration, `None` when waiting for Ctrl-C.
    pub fn capture_timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_secs > 0).then(|| std::time::Duration::from_secs(self.timeout_secs))
    }
}
