use std::net::SocketAddr;

use crate::routing::{DEFAULT_MAX_STEPS, RouteLimits};

pub const ADDR_VAR: &str = "GREAT_CIRCLE_ADDR";
pub const MAX_STEPS_VAR: &str = "GREAT_CIRCLE_MAX_STEPS";
const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid socket address: {source}")]
    Addr {
        var: &'static str,
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("{var}={value:?} must be a positive integer")]
    MaxSteps { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub limits: RouteLimits,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from any variable source, falling back to
    /// defaults for unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_value = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value.parse().map_err(|source| ConfigError::Addr {
            var: ADDR_VAR,
            value: addr_value.clone(),
            source,
        })?;

        let max_steps = match lookup(MAX_STEPS_VAR) {
            None => DEFAULT_MAX_STEPS,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(steps) if steps > 0 => steps,
                _ => {
                    return Err(ConfigError::MaxSteps {
                        var: MAX_STEPS_VAR,
                        value,
                    });
                }
            },
        };

        Ok(Self {
            addr,
            limits: RouteLimits {
                max_steps,
                ..RouteLimits::default()
            },
        })
    }
}
