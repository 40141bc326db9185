//! Polling engine for reactive shell variables
//!
//! This crate drives the refresh side of a desktop-shell widget backend:
//! it owns named reactive cells and keeps them fresh out-of-band, either
//! by invoking a producer on a fixed interval or by issuing an
//! asynchronous fetch whose result is parsed and published.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use vane_poll::{PollRule, Poller, ProcessRunner, TokioProcessRunner};
//!
//! let poller = Poller::new();
//! let runner = std::sync::Arc::new(TokioProcessRunner);
//!
//! let rule = PollRule::new(
//!     Duration::from_secs(60),
//!     move || {
//!         let runner = runner.clone();
//!         async move { runner.run(&["uptime".into(), "-p".into()]).await }
//!     },
//!     |raw: String| Ok(raw.trim().to_string()),
//! )?;
//!
//! let uptime = poller.spawn_polled("uptime", "0h 0m".to_string(), rule);
//!
//! let mut watcher = uptime.watch();
//! while watcher.changed().await.is_ok() {
//!     println!("uptime: {}", *watcher.borrow());
//! }
//! ```
//!
//! # Refresh policies
//!
//! - A failed tick (producer, fetch, or parse error) is logged and
//!   skipped; the cell keeps its previous value and never holds an error
//! - `spawn_polled` runs at most one producer invocation per cell at a
//!   time; ticks that would overlap a still-pending one are dropped
//! - `spawn_fetch_polled` lets fetches overlap but discards completions
//!   that are older than the last applied one, so a slow response never
//!   overwrites a newer value
//!
//! # Architecture
//!
//! ```text
//! vane-poll
//!     ├── Poller ──────── spawned tick loops + shutdown signals
//!     ├── PolledVar<T> ── cell + tokio watch bridge + stop()
//!     ├── EnvMap ──────── flat KEY=VALUE configuration
//!     └── collaborators ─ ProcessRunner / FileReader / HttpClient
//! ```

pub mod env;
pub mod error;
pub mod fs;
pub mod http;
pub mod logging;
pub mod poller;
pub mod rule;
pub mod runner;

// Re-exports - Public API
pub use env::EnvMap;
pub use error::{PollError, Result};
pub use fs::{FileReader, SystemFileReader};
pub use http::{HttpClient, ReqwestClient};
pub use poller::{PolledVar, Poller};
pub use rule::PollRule;
pub use runner::{ProcessRunner, TokioProcessRunner};

// Re-export the cell primitive so downstream crates don't need a direct
// cell-store dependency for the common case
pub use cell_store::{Cell, SubscriptionId};
