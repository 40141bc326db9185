//! Integration tests for the weather refresh flow, driven by a scripted
//! HTTP client so no network is involved.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use vane_poll::{EnvMap, HttpClient, PollError, Poller, Result};
use vane_weather::{WeatherConfig, WeatherFlow, WeatherSnapshot};

const WAIT: Duration = Duration::from_secs(2);

const GOOD_BODY: &str = r#"{
    "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
    "base": "stations",
    "main": {"temp": 12.5, "feels_like": 11.8, "temp_min": 11.0, "temp_max": 13.9,
             "pressure": 1009, "humidity": 84},
    "visibility": 9000,
    "wind": {"speed": 6.2, "deg": 190},
    "clouds": {"all": 90},
    "name": "Paris"
}"#;

/// HTTP client that replays a fixed script of responses, then repeats
/// the last entry.
struct ScriptedClient {
    responses: Vec<Result<String>>,
    calls: AtomicU64,
    last_url: std::sync::Mutex<String>,
}

impl ScriptedClient {
    fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses,
            calls: AtomicU64::new(0),
            last_url: std::sync::Mutex::new(String::new()),
        }
    }

    fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get(&self, url: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        *self.last_url.lock().unwrap() = url.to_string();
        let index = n.min(self.responses.len() - 1);
        match &self.responses[index] {
            Ok(body) => Ok(body.clone()),
            Err(PollError::HttpStatus(status)) => Err(PollError::HttpStatus(*status)),
            Err(e) => Err(PollError::RefreshFailed(e.to_string())),
        }
    }
}

fn test_env() -> EnvMap {
    EnvMap::parse("CITY=Paris\nOPENWEATHERAPIKEY=abc123\n")
}

fn fast_config() -> WeatherConfig {
    WeatherConfig {
        endpoint: DEFAULT_TEST_ENDPOINT.to_string(),
        interval: Duration::from_millis(30),
    }
}

const DEFAULT_TEST_ENDPOINT: &str = "http://127.0.0.1:1/weather";

#[tokio::test]
async fn fallback_stays_published_while_fetches_fail() {
    let poller = Poller::new();
    let client = Arc::new(ScriptedClient::new(vec![Err(PollError::RefreshFailed(
        "connection refused".to_string(),
    ))]));

    let weather = WeatherFlow::spawn(&poller, &test_env(), client.clone(), fast_config()).unwrap();

    // Let several failing ticks pass
    timeout(WAIT, async {
        while client.call_count() < 3 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(weather.get(), WeatherSnapshot::fallback());
    poller.shutdown();
}

#[tokio::test]
async fn successful_fetch_replaces_snapshot_wholesale() {
    let poller = Poller::new();
    let client = Arc::new(ScriptedClient::new(vec![Ok(GOOD_BODY.to_string())]));

    let weather = WeatherFlow::spawn(&poller, &test_env(), client.clone(), fast_config()).unwrap();

    let mut watcher = weather.watch();
    timeout(WAIT, async {
        loop {
            if watcher.borrow().name == "Paris" {
                break;
            }
            watcher.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    let snapshot = weather.get();
    assert_eq!(snapshot.weather[0].id, 500);
    assert_eq!(snapshot.main.temp, 12.5);
    // Nothing from the fallback survives
    assert_ne!(snapshot.name, "New Delhi");

    // The request URL carries the verbatim substitutions
    assert_eq!(
        *client.last_url.lock().unwrap(),
        format!("{DEFAULT_TEST_ENDPOINT}?q=Paris&appid=abc123&units=metric")
    );

    poller.shutdown();
}

#[tokio::test]
async fn failure_after_success_keeps_last_good_snapshot() {
    let poller = Poller::new();
    let client = Arc::new(ScriptedClient::new(vec![
        Ok(GOOD_BODY.to_string()),
        Err(PollError::HttpStatus(401)),
        Ok("not json".to_string()),
    ]));

    let weather = WeatherFlow::spawn(&poller, &test_env(), client.clone(), fast_config()).unwrap();

    let mut watcher = weather.watch();
    timeout(WAIT, async {
        loop {
            if watcher.borrow().name == "Paris" {
                break;
            }
            watcher.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    // Ride through a non-2xx tick and a malformed-body tick
    timeout(WAIT, async {
        while client.call_count() < 4 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(weather.get().name, "Paris");
    poller.shutdown();
}
