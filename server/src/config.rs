//! Relay configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_CLIENT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("CLIENT_QUEUE_CAPACITY must be at least 1")]
    ZeroQueueCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Broadcast shapes back to their sender as well as to peers.
    pub echo: bool,
    /// Bounded outbound queue per client; frames beyond it are dropped.
    pub client_queue_capacity: usize,
    /// Directory of static assets (the built wasm bundle) served at `/`.
    pub static_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            port: DEFAULT_PORT,
            echo: false,
            client_queue_capacity: DEFAULT_CLIENT_QUEUE_CAPACITY,
            static_dir: None,
        }
    }
}

impl RelayConfig {
    /// Build typed relay config from environment variables.
    ///
    /// Optional:
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `RELAY_ECHO`: `true`/`false`, default `false`
    /// - `CLIENT_QUEUE_CAPACITY`: default 256
    /// - `STATIC_DIR`: no static serving when absent
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let bind_addr = env_parse(&lookup, "BIND_ADDR", defaults.bind_addr)?;
        let port = env_parse(&lookup, "PORT", defaults.port)?;
        let echo = env_parse(&lookup, "RELAY_ECHO", defaults.echo)?;
        let client_queue_capacity = env_parse(&lookup, "CLIENT_QUEUE_CAPACITY", defaults.client_queue_capacity)?;
        if client_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        let static_dir = lookup("STATIC_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { bind_addr, port, echo, client_queue_capacity, static_dir })
    }

    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn env_parse<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed.parse().map_err(|_| ConfigError::Invalid { var, value: raw.clone() })
}
