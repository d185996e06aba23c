use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log a state summary line on every emit.
    pub debug: bool,
    /// Interval between axis emissions in milliseconds (20 = 50 Hz).
    pub emit_interval_ms: u64,
    /// Armband bridge connection.
    pub link: LinkConfig,
}

impl AppConfig {
    pub fn emit_interval(&self) -> Duration {
        // A zero period would make the emit timer panic.
        Duration::from_millis(self.emit_interval_ms.max(1))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            emit_interval_ms: 20,
            link: LinkConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Host running the armband bridge.
    pub host: String,
    /// TCP port of the bridge's event stream.
    pub port: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7210,
        }
    }
}
