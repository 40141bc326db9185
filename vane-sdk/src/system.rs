//! ShellVars - main entry point for the SDK
//!
//! Constructs the poller, loads the environment file, and spawns the
//! three built-in variables. The instance is caller-owned: consumers
//! receive handles, and `shutdown` stops every tick loop.

use std::sync::Arc;

use tracing::{info, warn};
use vane_poll::{
    EnvMap, FileReader, HttpClient, PolledVar, Poller, ProcessRunner, ReqwestClient,
    SystemFileReader, TokioProcessRunner,
};
use vane_weather::{WeatherFlow, WeatherSnapshot};

use crate::config::ShellVarsConfig;
use crate::error::SdkError;
use crate::vars;

/// The shell variable system
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), vane_sdk::SdkError> {
/// use vane_sdk::ShellVars;
///
/// let vars = ShellVars::builder().build().await?;
///
/// let uptime = vars.uptime().get();
/// let mut weather = vars
///     .weather()
///     .expect("weather enabled by default")
///     .watch();
///
/// weather.changed().await.ok();
/// println!("{} ({})", uptime, weather.borrow().name);
///
/// vars.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct ShellVars {
    poller: Poller,
    env: Option<EnvMap>,
    uptime: PolledVar<String>,
    brightness: PolledVar<u32>,
    weather: Option<PolledVar<WeatherSnapshot>>,
}

impl ShellVars {
    /// Start building a system with default collaborators
    pub fn builder() -> ShellVarsBuilder {
        ShellVarsBuilder::new()
    }

    /// The uptime string variable (e.g. `"5h 3m"`)
    pub fn uptime(&self) -> &PolledVar<String> {
        &self.uptime
    }

    /// The raw brightness level variable
    pub fn brightness(&self) -> &PolledVar<u32> {
        &self.brightness
    }

    /// The weather snapshot variable, when the flow is enabled
    pub fn weather(&self) -> Option<&PolledVar<WeatherSnapshot>> {
        self.weather.as_ref()
    }

    /// The loaded environment map, when the weather flow required one
    pub fn env(&self) -> Option<&EnvMap> {
        self.env.as_ref()
    }

    /// Stop all tick loops
    ///
    /// Values stay readable afterwards; they just stop refreshing.
    pub fn shutdown(&self) {
        self.poller.shutdown();
        info!("shell variables shut down");
    }
}

/// Builder for [`ShellVars`] with injectable collaborators
pub struct ShellVarsBuilder {
    config: ShellVarsConfig,
    runner: Arc<dyn ProcessRunner>,
    reader: Arc<dyn FileReader>,
    http: Option<Arc<dyn HttpClient>>,
}

impl ShellVarsBuilder {
    /// Defaults: system collaborators, default configuration
    pub fn new() -> Self {
        Self {
            config: ShellVarsConfig::default(),
            runner: Arc::new(TokioProcessRunner),
            reader: Arc::new(SystemFileReader),
            http: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ShellVarsConfig) -> Self {
        self.config = config;
        self
    }

    /// Substitute the process runner (tests script command output)
    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Substitute the file reader
    pub fn reader(mut self, reader: Arc<dyn FileReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Substitute the HTTP client
    pub fn http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Load configuration and spawn all variables
    ///
    /// With the weather flow enabled (the default), a missing or
    /// unreadable environment file fails the build with
    /// `SourceUnavailable`, and a loaded file lacking `CITY` or
    /// `OPENWEATHERAPIKEY` fails with `MissingKey` - in both cases no
    /// fetch is ever attempted. With the flow disabled the environment
    /// file is not read at all.
    pub async fn build(self) -> Result<ShellVars, SdkError> {
        // Resolve the weather flow's inputs before spawning anything,
        // so a configuration failure leaves no running tasks behind
        let env = match &self.config.weather {
            Some(_) => Some(EnvMap::load(&*self.reader, &self.config.env_path).await?),
            None => None,
        };

        let poller = Poller::new();
        let uptime = vars::spawn_uptime(
            &poller,
            Arc::clone(&self.runner),
            self.config.uptime_interval,
        )?;
        let brightness = vars::spawn_brightness(
            &poller,
            Arc::clone(&self.runner),
            self.config.brightness_interval,
        )?;

        let weather = match (&self.config.weather, &env) {
            (Some(weather_config), Some(env)) => {
                let http: Arc<dyn HttpClient> = match self.http {
                    Some(http) => http,
                    None => Arc::new(ReqwestClient::new()?),
                };
                let flow = WeatherFlow::spawn(&poller, env, http, weather_config.clone());
                match flow {
                    Ok(var) => Some(var),
                    Err(e) => {
                        // Tear down the variables spawned above before
                        // surfacing the failure
                        poller.shutdown();
                        warn!(error = %e, "weather flow failed to start");
                        return Err(e.into());
                    }
                }
            }
            _ => None,
        };

        info!(
            weather = weather.is_some(),
            "shell variables started"
        );

        Ok(ShellVars {
            poller,
            env,
            uptime,
            brightness,
            weather,
        })
    }
}

impl Default for ShellVarsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
