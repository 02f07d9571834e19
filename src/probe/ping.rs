//! Ping-based reachability probing.
//!
//! Shells out to the system `ping` utility and extracts the packet loss
//! percentage from its summary line. Anything that prevents a measurement
//! (spawn failure, timeout, missing summary) is reported as full loss.

use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::probe::{Prober, FULL_LOSS};

fn loss_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+(\.\d+)?)%\s*packet loss").unwrap())
}

/// Extract the loss percentage from ping output, truncating fractional
/// values. Output without a recognizable summary reads as full loss.
fn extract_loss(output: &str) -> u8 {
    let Some(captures) = loss_pattern().captures(output) else {
        return FULL_LOSS;
    };
    match captures[1].parse::<f32>() {
        Ok(loss) => loss.clamp(0.0, FULL_LOSS as f32) as u8,
        Err(_) => FULL_LOSS,
    }
}

/// Probes targets with the system `ping` binary.
pub struct PingProber {
    count: u32,
    timeout: Duration,
}

impl PingProber {
    /// `count` echo requests per probe, `timeout_secs` per-reply wait.
    pub fn new(count: u32, timeout_secs: u64) -> Self {
        Self {
            count,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, target: &str) -> u8 {
        let mut command = Command::new("ping");
        command
            .arg("-c")
            .arg(self.count.to_string())
            .arg("-W")
            .arg(self.timeout.as_secs().to_string())
            .arg(target)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Hard deadline above ping's own timeout, in case ping itself hangs
        // on name resolution.
        let deadline = self.timeout * self.count.max(1) + Duration::from_secs(1);

        let output = match tokio::time::timeout(deadline, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::warn!(target = %target, error = %e, "Failed to run ping");
                return FULL_LOSS;
            }
            Err(_) => {
                tracing::debug!(target = %target, "Ping exceeded hard deadline");
                return FULL_LOSS;
            }
        };

        // ping prints the loss summary on stdout; unresolvable names land on
        // stderr with no summary at all, which reads as full loss.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        extract_loss(&text)
    }
}
