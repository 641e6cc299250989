use std::net::SocketAddr;
use std::time::Duration;

use bon::Builder;

use crate::error::ConfigError;

pub const DEFAULT_ADDR: &str = "[::1]:8080";
pub const DEFAULT_ENDPOINT: &str = "http://[::1]:8080";

/// Configuration for the greet server.
#[derive(Debug, Clone, Builder)]
pub struct ServerConfig {
    /// Address the gRPC server listens on.
    #[builder(default = default_addr())]
    pub addr: SocketAddr,

    /// Pause between consecutive responses of a server-streaming call.
    /// Zero disables pacing.
    #[builder(default = Duration::ZERO)]
    pub stream_interval: Duration,

    /// Deadline for a whole streaming session, measured from when it opens.
    pub session_timeout: Option<Duration>,

    /// Capacity of each session's outbound channel.
    #[builder(default = 1)]
    pub outbound_buffer: usize,
}

impl ServerConfig {
    /// Read the configuration from `GREET_ADDR`, `GREET_STREAM_INTERVAL_MS`
    /// and `GREET_SESSION_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = match std::env::var("GREET_ADDR") {
            Ok(value) => parse_addr("GREET_ADDR", value)?,
            Err(_) => default_addr(),
        };
        let stream_interval = env_millis("GREET_STREAM_INTERVAL_MS")?.unwrap_or(Duration::ZERO);
        let session_timeout = env_millis("GREET_SESSION_TIMEOUT_MS")?;

        Ok(Self::builder()
            .addr(addr)
            .stream_interval(stream_interval)
            .maybe_session_timeout(session_timeout)
            .build())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration for the greet client.
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Server endpoint URI.
    #[builder(into, default = DEFAULT_ENDPOINT.to_string())]
    pub endpoint: String,

    /// Deadline applied to each call.
    #[builder(default = Duration::from_secs(1))]
    pub timeout: Duration,
}

impl ClientConfig {
    /// Read the endpoint from `GREET_ENDPOINT`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var("GREET_ENDPOINT") {
            Ok(endpoint) => Self::builder().endpoint(endpoint).build(),
            Err(_) => Self::builder().build(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 1], 8080))
}

fn parse_addr(var: &'static str, value: String) -> Result<SocketAddr, ConfigError> {
    value
        .parse()
        .map_err(|source| ConfigError::InvalidAddr { var, value, source })
}

fn parse_millis(var: &'static str, value: String) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|source| ConfigError::InvalidDuration { var, value, source })
}

fn env_millis(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    std::env::var(var)
        .ok()
        .map(|value| parse_millis(var, value))
        .transpose()
}
