//! # Host Configuration
//!
//! Runtime parameters for the component host. Every field has a sane
//! default and an environment override, so embedding processes can tune
//! the host without recompiling.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PLUGBOARD_UNLOAD_WAIT_MS` | `100` | Bounded wait for references to drain during unload |
//! | `PLUGBOARD_BUS_CAPACITY` | `1024` | Per-subscriber event buffer on the bus |
//! | `PLUGBOARD_LOG_SEVERITY` | unset | Initial severity regex installed on the log relay |

use plugboard_bus::DEFAULT_CHANNEL_CAPACITY;
use std::time::Duration;

/// Complete host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// How long the unload walk waits for a node's references to drain
    /// before recording `ReferenceStillHeld` and moving on.
    pub unload_wait: Duration,
    /// Per-subscriber buffer capacity of the bootstrap event bus.
    pub bus_capacity: usize,
    /// Initial severity filter regex for the bootstrap log relay.
    pub log_severity: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            unload_wait: Duration::from_millis(100),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_severity: None,
        }
    }
}

impl HostConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("PLUGBOARD_UNLOAD_WAIT_MS") {
            if let Ok(millis) = value.parse::<u64>() {
                config.unload_wait = Duration::from_millis(millis);
            }
        }
        if let Ok(value) = std::env::var("PLUGBOARD_BUS_CAPACITY") {
            if let Ok(capacity) = value.parse::<usize>() {
                if capacity > 0 {
                    config.bus_capacity = capacity;
                }
            }
        }
        if let Ok(value) = std::env::var("PLUGBOARD_LOG_SEVERITY") {
            if !value.is_empty() {
                config.log_severity = Some(value);
            }
        }

        config
    }

    /// Override the unload wait, builder-style.
    #[must_use]
    pub fn with_unload_wait(mut self, wait: Duration) -> Self {
        self.unload_wait = wait;
        self
    }
}
