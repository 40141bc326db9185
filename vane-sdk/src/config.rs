//! Configuration for the shell variable system
//!
//! Controls where the environment file lives and how often each
//! variable refreshes.

use std::path::PathBuf;
use std::time::Duration;

use vane_weather::WeatherConfig;

/// Configuration for [`ShellVars`](crate::ShellVars)
#[derive(Debug, Clone)]
pub struct ShellVarsConfig {
    /// Path of the `KEY=VALUE` environment file
    /// Default: `<config_dir>/vane/.env`
    pub env_path: PathBuf,

    /// Uptime refresh interval
    /// Default: 60 seconds
    pub uptime_interval: Duration,

    /// Brightness refresh interval
    /// Default: 1 second
    pub brightness_interval: Duration,

    /// Weather flow configuration; `None` disables the flow (and with
    /// it the requirement that the environment file exists)
    /// Default: enabled with a 5-second interval
    pub weather: Option<WeatherConfig>,
}

impl Default for ShellVarsConfig {
    fn default() -> Self {
        Self {
            env_path: default_env_path(),
            uptime_interval: Duration::from_secs(60),
            brightness_interval: Duration::from_secs(1),
            weather: Some(WeatherConfig::default()),
        }
    }
}

/// The default environment file location
///
/// Falls back to the current directory when no platform config
/// directory is available.
pub fn default_env_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vane")
        .join(".env")
}
