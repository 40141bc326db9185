//! Structured weather snapshot mirroring the OpenWeatherMap
//! current-weather response
//!
//! The model keeps only the fields the widgets consume. Unknown JSON
//! fields are ignored; the auxiliary sections (`base`, `visibility`,
//! `wind`, `clouds`) default when absent, while the core sections
//! (`weather`, `main`, `name`) are required so that an unrelated JSON
//! document fails to parse instead of producing an empty snapshot.

use serde::{Deserialize, Serialize};

/// One weather condition entry (OpenWeatherMap sends a list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Provider condition code (e.g. 701 = mist)
    pub id: u32,
    /// Condition group, e.g. "Mist"
    pub main: String,
    /// Human-readable description
    pub description: String,
    /// Provider icon name, e.g. "50d"
    pub icon: String,
}

/// Main measurements block, metric units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

/// Wind block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

/// Cloud cover block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: u32,
}

/// The latest successfully parsed weather state
///
/// Replaced wholesale on every successful fetch-and-parse cycle, never
/// merged field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: String,
    pub main: MainReadings,
    #[serde(default)]
    pub visibility: u32,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Clouds,
    /// Location name as reported by the provider
    pub name: String,
}

impl WeatherSnapshot {
    /// The snapshot published before the first successful refresh
    ///
    /// The condition description doubles as the user-facing notice shown
    /// while no network data has arrived yet.
    pub fn fallback() -> Self {
        Self {
            weather: vec![Condition {
                id: 701,
                main: "Weather Not Available".to_string(),
                description: "Connect To Internet".to_string(),
                icon: "50d".to_string(),
            }],
            base: "stations".to_string(),
            main: MainReadings {
                temp: 0.0,
                feels_like: 0.0,
                temp_min: 0.0,
                temp_max: 0.0,
                pressure: 0.0,
                humidity: 0.0,
            },
            visibility: 1000,
            wind: Wind::default(),
            clouds: Clouds { all: 20 },
            name: "New Delhi".to_string(),
        }
    }
}
