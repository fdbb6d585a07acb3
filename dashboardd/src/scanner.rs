use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::ScanConfig;

/// Fire-and-forget trigger for the external network scanner.
///
/// The scanner runs its own pipeline (scan, parse, write the services and
/// progress documents); the daemon only starts it and polls the progress
/// document it leaves behind.
pub struct Scanner {
    script: PathBuf,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            script: config.script.clone(),
        }
    }

    /// Start a scan and return immediately. The child is detached; its
    /// completion is observed only through the progress document.
    pub fn trigger(&self) -> Result<()> {
        if !self.script.exists() {
            bail!("Scan script not found");
        }

        Command::new(&self.script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start scan script {}", self.script.display()))?;

        tracing::info!("Scan started via {}", self.script.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_missing_script_fails() {
        let scanner = Scanner {
            script: PathBuf::from("/nonexistent/scan.sh"),
        };
        assert!(scanner.trigger().is_err());
    }
}
