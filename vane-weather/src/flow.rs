//! Periodic fetch-and-publish flow for weather snapshots
//!
//! Composes the polling engine's fetch path with the snapshot model:
//! the request URL is built once from the environment map, each tick
//! GETs it, and a successfully parsed body replaces the published
//! snapshot wholesale.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::info;
use url::Url;
use vane_poll::{EnvMap, HttpClient, PollError, PolledVar, Poller, Result};

use crate::model::WeatherSnapshot;

/// Default OpenWeatherMap current-weather endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Environment key naming the city to query
pub const CITY_KEY: &str = "CITY";

/// Environment key holding the provider API key
pub const API_KEY_KEY: &str = "OPENWEATHERAPIKEY";

/// Configuration for the weather refresh flow
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Endpoint queried on every tick
    /// Default: [`DEFAULT_ENDPOINT`]
    pub endpoint: String,

    /// Refresh interval
    /// Default: 5 seconds
    pub interval: Duration,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            interval: Duration::from_secs(5),
        }
    }
}

/// Spawns and names the weather variable
pub struct WeatherFlow;

impl WeatherFlow {
    /// Build the request URL from the endpoint and the two required
    /// environment entries
    ///
    /// The query is `?q=<city>&appid=<key>&units=metric`, substitutions
    /// verbatim.
    pub fn build_url(endpoint: &str, city: &str, api_key: &str) -> Result<Url> {
        Url::parse_with_params(
            endpoint,
            [("q", city), ("appid", api_key), ("units", "metric")],
        )
        .map_err(|e| PollError::Init(format!("weather endpoint: {e}")))
    }

    /// Start the periodic refresh and return the weather variable
    ///
    /// Fails with [`PollError::MissingKey`] when `CITY` or
    /// `OPENWEATHERAPIKEY` is absent - in that case no fetch is ever
    /// attempted. The returned variable is seeded with
    /// [`WeatherSnapshot::fallback`], which stays published until the
    /// first successful fetch-and-parse cycle.
    pub fn spawn(
        poller: &Poller,
        env: &EnvMap,
        client: Arc<dyn HttpClient>,
        config: WeatherConfig,
    ) -> Result<PolledVar<WeatherSnapshot>> {
        let city = env.require(CITY_KEY)?;
        let api_key = env.require(API_KEY_KEY)?;
        let url = Self::build_url(&config.endpoint, city, api_key)?;

        info!(city, interval = ?config.interval, "starting weather refresh");

        let fetch = move || {
            let client = Arc::clone(&client);
            let url = url.clone();
            async move { client.get(url.as_str()).await }.boxed()
        };
        let parse = |body: &str| {
            serde_json::from_str::<WeatherSnapshot>(body)
                .map_err(|e| PollError::MalformedResponse(e.to_string()))
        };

        poller.spawn_fetch_polled(
            "weather",
            WeatherSnapshot::fallback(),
            config.interval,
            fetch,
            parse,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_substitutions_verbatim() {
        let url = WeatherFlow::build_url(DEFAULT_ENDPOINT, "Paris", "abc123").unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.openweathermap.org/data/2.5/weather?q=Paris&appid=abc123&units=metric"
        );
    }

    #[test]
    fn test_url_uses_configured_endpoint() {
        let url = WeatherFlow::build_url("http://127.0.0.1:8080/weather", "Oslo", "k").unwrap();

        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/weather?q=Oslo&appid=k&units=metric"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(WeatherFlow::build_url("not a url", "Paris", "abc123").is_err());
    }

    #[tokio::test]
    async fn test_missing_keys_mean_no_fetch() {
        struct PanickingClient;

        #[async_trait::async_trait]
        impl HttpClient for PanickingClient {
            async fn get(&self, _url: &str) -> Result<String> {
                panic!("fetch must not be attempted without CITY and key");
            }
        }

        let poller = Poller::new();
        let env = EnvMap::parse("CITY=Paris\n");

        let result = WeatherFlow::spawn(
            &poller,
            &env,
            Arc::new(PanickingClient),
            WeatherConfig::default(),
        );

        assert!(matches!(
            result,
            Err(PollError::MissingKey(key)) if key == API_KEY_KEY
        ));
        assert_eq!(poller.task_count(), 0);
    }
}
