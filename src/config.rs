//! Layered runtime configuration.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. environment variables prefixed `LATENCYSCOPE_` (e.g. `LATENCYSCOPE_POLL_INTERVAL=5s`)
//! 4. command-line flags
//!
//! Configuration is read once at startup. Changing it means restarting.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use latencyscope_types::Target;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::default_targets;
use crate::data::duration::parse_duration;

pub const ENV_PREFIX: &str = "LATENCYSCOPE";

/// Added to `probe_timeout` when `endpoint_timeout` is not set. A remote
/// endpoint only answers after its slowest target resolves.
pub const ENDPOINT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Default deadline for one request to the aggregation endpoint.
pub fn default_endpoint_timeout(probe_timeout: Duration) -> Duration {
    probe_timeout + ENDPOINT_TIMEOUT_MARGIN
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid duration for `{key}`: {reason}")]
    Duration { key: &'static str, reason: String },

    #[error("Invalid listen address `{0}`")]
    Listen(String),

    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),

    #[error("No probe targets configured")]
    NoTargets,
}

/// Values as they appear in files and the environment.
#[derive(Debug, Deserialize)]
struct RawSettings {
    poll_interval: String,
    probe_timeout: String,
    endpoint_timeout: Option<String>,
    user_agent: String,
    history_points: u64,
    listen: String,
    endpoint: String,
    jitter_seed: Option<u64>,
    log_file: PathBuf,
    targets: Option<Vec<Target>>,
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub poll_interval: Option<String>,
    pub probe_timeout: Option<String>,
    pub endpoint_timeout: Option<String>,
    pub listen: Option<String>,
    pub endpoint: Option<String>,
    pub jitter_seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub poll_interval: Duration,
    pub probe_timeout: Duration,
    /// Deadline for one request to the aggregation endpoint.
    pub endpoint_timeout: Duration,
    pub user_agent: String,
    pub history_points: usize,
    pub listen: SocketAddr,
    pub endpoint: String,
    pub jitter_seed: Option<u64>,
    pub log_file: PathBuf,
    pub targets: Vec<Target>,
}

impl Settings {
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("poll_interval", "10s")?
            .set_default("probe_timeout", "8s")?
            .set_default("user_agent", crate::probe::DEFAULT_USER_AGENT)?
            .set_default("history_points", crate::data::DEFAULT_HISTORY_POINTS as u64)?
            .set_default("listen", "127.0.0.1:3000")?
            .set_default("endpoint", "http://127.0.0.1:3000/api/latency")?
            .set_default("log_file", "latencyscope.log")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let raw: RawSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("poll_interval", overrides.poll_interval.clone())?
            .set_override_option("probe_timeout", overrides.probe_timeout.clone())?
            .set_override_option("endpoint_timeout", overrides.endpoint_timeout.clone())?
            .set_override_option("listen", overrides.listen.clone())?
            .set_override_option("endpoint", overrides.endpoint.clone())?
            .set_override_option("jitter_seed", overrides.jitter_seed)?
            .set_override_option(
                "log_file",
                overrides.log_file.as_ref().map(|p| p.display().to_string()),
            )?
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let poll_interval = duration_key("poll_interval", &raw.poll_interval)?;
        let probe_timeout = duration_key("probe_timeout", &raw.probe_timeout)?;
        let endpoint_timeout = match &raw.endpoint_timeout {
            Some(value) => duration_key("endpoint_timeout", value)?,
            None => default_endpoint_timeout(probe_timeout),
        };

        let listen = raw
            .listen
            .parse()
            .map_err(|_| ConfigError::Listen(raw.listen.clone()))?;

        if raw.history_points == 0 {
            return Err(ConfigError::Zero("history_points"));
        }

        let targets = match raw.targets {
            None => default_targets(),
            Some(targets) if targets.is_empty() => return Err(ConfigError::NoTargets),
            Some(targets) => targets,
        };

        Ok(Self {
            poll_interval,
            probe_timeout,
            endpoint_timeout,
            user_agent: raw.user_agent,
            history_points: raw.history_points as usize,
            listen,
            endpoint: raw.endpoint,
            jitter_seed: raw.jitter_seed,
            log_file: raw.log_file,
            targets,
        })
    }
}

fn duration_key(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let duration = parse_duration(value).map_err(|e| ConfigError::Duration {
        key,
        reason: e.to_string(),
    })?;
    if duration.is_zero() {
        return Err(ConfigError::Zero(key));
    }
    Ok(duration)
}
