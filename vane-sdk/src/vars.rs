//! Built-in shell-derived variables
//!
//! Each variable pairs a command with a pure postprocess step, so the
//! parsing is unit-testable without spawning anything.

use std::sync::Arc;
use std::time::Duration;

use vane_poll::{PollError, PollRule, PolledVar, Poller, ProcessRunner, Result};

/// Turn `uptime -p` output into the compact widget form
///
/// `"up 5 hours, 3 minutes"` becomes `"5h 3m"`. Day-scale segments are
/// passed through untouched.
pub fn normalize_uptime(raw: &str) -> String {
    let s = raw.trim();
    let s = s.strip_prefix("up ").unwrap_or(s);
    s.replace(" hours,", "h")
        .replace(" hour,", "h")
        .replace(" minutes", "m")
        .replace(" minute", "m")
}

fn parse_brightness(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| PollError::RefreshFailed(format!("brightness parse: {e}")))
}

pub(crate) fn spawn_uptime(
    poller: &Poller,
    runner: Arc<dyn ProcessRunner>,
    interval: Duration,
) -> Result<PolledVar<String>> {
    let rule = PollRule::new(
        interval,
        move || {
            let runner = Arc::clone(&runner);
            async move {
                runner
                    .run(&["uptime".to_string(), "-p".to_string()])
                    .await
            }
        },
        |raw: String| Ok(normalize_uptime(&raw)),
    )?;
    Ok(poller.spawn_polled("uptime", "0h 0m".to_string(), rule))
}

pub(crate) fn spawn_brightness(
    poller: &Poller,
    runner: Arc<dyn ProcessRunner>,
    interval: Duration,
) -> Result<PolledVar<u32>> {
    let rule = PollRule::new(
        interval,
        move || {
            let runner = Arc::clone(&runner);
            async move {
                runner
                    .run(&["brightnessctl".to_string(), "g".to_string()])
                    .await
            }
        },
        |raw: String| parse_brightness(&raw),
    )?;
    Ok(poller.spawn_polled("brightness", 0u32, rule))
}
