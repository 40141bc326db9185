//! # Vane SDK - Reactive variables for desktop-shell widgets
//!
//! Owns a small set of named reactive variables - an uptime string, a
//! brightness level, and a weather snapshot - refreshed out-of-band and
//! exposed for read and subscribe by presentation code:
//!
//! ```rust,no_run
//! use vane_sdk::ShellVars;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vane_sdk::SdkError> {
//!     let vars = ShellVars::builder().build().await?;
//!
//!     // Read the current value
//!     println!("uptime: {}", vars.uptime().get());
//!
//!     // Watch for changes
//!     let mut brightness = vars.brightness().watch();
//!     while brightness.changed().await.is_ok() {
//!         println!("brightness: {}", *brightness.borrow());
//!     }
//!
//!     vars.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## Key Behaviors
//!
//! - **Last known good**: a failed refresh never disturbs the published
//!   value; the weather variable starts on a hard-coded fallback
//!   snapshot that doubles as the "no internet yet" notice
//! - **Explicit ownership**: all variables live on a caller-owned
//!   `ShellVars` instance with a `shutdown()` teardown hook - no
//!   ambient singletons, no leaked timers
//! - **Injectable collaborators**: process runner, file reader, and
//!   HTTP client are traits, so tests script every input
//!
//! ## Configuration
//!
//! A flat `KEY=VALUE` file (default `<config_dir>/vane/.env`) supplies
//! the weather flow's two required entries, `CITY` and
//! `OPENWEATHERAPIKEY`. A missing file fails the build with
//! `SourceUnavailable` unless the weather flow is disabled.
//!
//! ## Architecture
//!
//! ```text
//! vane-sdk (ShellVars facade)
//!     ↓
//! vane-weather (snapshot model + refresh flow)
//!     ↓
//! vane-poll (tick loops, env map, collaborators)
//!     ↓
//! cell-store (reactive cells)
//! ```

// Main exports
pub use config::ShellVarsConfig;
pub use error::SdkError;
pub use system::{ShellVars, ShellVarsBuilder};

// Re-export commonly used types from the lower crates
pub use cell_store::{Cell, SubscriptionId};
pub use vane_poll::logging::{init_logging, init_logging_from_env, LoggingMode};
pub use vane_poll::{
    EnvMap, FileReader, HttpClient, PollError, PolledVar, ProcessRunner,
};
pub use vane_weather::{WeatherConfig, WeatherSnapshot};

// Internal modules
mod config;
mod error;
mod system;
mod vars;

pub use vars::normalize_uptime;
