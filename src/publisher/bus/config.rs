//! Event bus transport configuration

use serde::{Deserialize, Serialize};

/// Configuration for the batch event bus publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusConfig {
    /// Base URL of the bus submission endpoint
    ///
    /// Required; publisher construction fails fast when unset.
    #[serde(default)]
    pub endpoint: String,

    /// Name of the target event bus
    pub bus_name: String,

    /// Name of the emitting service, stamped into every envelope and entry
    pub source: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            bus_name: "default".to_string(),
            source: "stickerlandia".to_string(),
            request_timeout_secs: 10,
        }
    }
}
