//! External status query and injected clock

use anyhow::{Context, bail};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Source of raw WireGuard status output. The production impl shells out to
/// `wg`; tests substitute canned output and failure modes.
#[async_trait]
pub trait StatusQuery: Send + Sync {
    async fn dump(&self) -> anyhow::Result<String>;
}

/// Runs a status command (by default `wg show all dump`) with a bounded
/// timeout. Without the bound a hung subprocess would hold the cache lock
/// and stall every serving task.
pub struct WgDump {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl WgDump {
    pub fn new(timeout: Duration) -> Self {
        Self::with_command("wg", &["show", "all", "dump"], timeout)
    }

    pub fn with_command(program: &str, args: &[&str], timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout,
        }
    }
}

impl Default for WgDump {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl StatusQuery for WgDump {
    async fn dump(&self) -> anyhow::Result<String> {
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program).args(&self.args).output(),
        )
        .await
        .with_context(|| format!("{} timed out", self.program))?
        .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("{} output is not UTF-8", self.program))
    }
}

/// Time source for the cache's staleness check, injected so tests can move
/// time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
