//! Weather snapshot model and refresh flow
//!
//! Periodically fetches current weather for a configured city from an
//! OpenWeatherMap-compatible endpoint and publishes each successfully
//! parsed snapshot to a reactive cell. Failures of any kind (network,
//! non-2xx status, malformed body) leave the previously published
//! snapshot untouched, so consumers always see the last known good data
//! - or the hard-coded fallback before the first successful refresh.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vane_poll::{EnvMap, Poller, ReqwestClient};
//! use vane_weather::{WeatherConfig, WeatherFlow};
//!
//! let poller = Poller::new();
//! let env = EnvMap::parse("CITY=Paris\nOPENWEATHERAPIKEY=abc123\n");
//! let client = Arc::new(ReqwestClient::new()?);
//!
//! let weather = WeatherFlow::spawn(&poller, &env, client, WeatherConfig::default())?;
//!
//! let mut watcher = weather.watch();
//! while watcher.changed().await.is_ok() {
//!     let snapshot = watcher.borrow().clone();
//!     println!("{}: {:.1}°C", snapshot.name, snapshot.main.temp);
//! }
//! ```

pub mod flow;
pub mod model;

pub use flow::{WeatherConfig, WeatherFlow, DEFAULT_ENDPOINT};
pub use model::{Clouds, Condition, MainReadings, WeatherSnapshot, Wind};
