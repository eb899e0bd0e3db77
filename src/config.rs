//! Environment-based configuration
//!
//! | Variable                   | Meaning                                     |
//! |----------------------------|---------------------------------------------|
//! | `EVENTS_LISTEN_ADDR`       | HTTP listen address; unset disables it      |
//! | `EVENTS_SUBSCRIBER_BUFFER` | entries a subscriber may lag (default 1024) |
//! | `EVENTS_ARTIFACTS`         | comma-separated artifacts to seed state     |

use crate::error::{Error, Result};
use crate::event_log::DEFAULT_SUBSCRIBER_BUFFER;

pub const ENV_LISTEN_ADDR: &str = "EVENTS_LISTEN_ADDR";
pub const ENV_SUBSCRIBER_BUFFER: &str = "EVENTS_SUBSCRIBER_BUFFER";
pub const ENV_ARTIFACTS: &str = "EVENTS_ARTIFACTS";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsConfig {
    /// Address to serve the event API on; `None` disables the interface
    pub listen_addr: Option<String>,
    /// Per-subscriber buffer before a slow subscriber is dropped
    pub subscriber_buffer: usize,
    /// Artifacts known up front, reported as not started
    pub artifacts: Vec<String>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            listen_addr: None,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            artifacts: Vec::new(),
        }
    }
}

impl EventsConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            listen_addr: lookup(ENV_LISTEN_ADDR)
                .map(|addr| addr.trim().to_string())
                .filter(|addr| !addr.is_empty()),
            ..Self::default()
        };

        if let Some(raw) = lookup(ENV_SUBSCRIBER_BUFFER) {
            config.subscriber_buffer = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config {
                        key: ENV_SUBSCRIBER_BUFFER.to_string(),
                        message: format!("expected a positive integer, got {:?}", raw),
                    })
                }
            };
        }

        if let Some(raw) = lookup(ENV_ARTIFACTS) {
            config.artifacts = raw
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }
}
