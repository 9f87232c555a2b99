//! NATS transport configuration

use serde::{Deserialize, Serialize};

/// JetStream storage backend for the sticker event stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Durable file-backed storage
    #[default]
    File,
    /// In-memory storage (tests, ephemeral deployments)
    Memory,
}

/// Configuration for the NATS JetStream publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,

    /// Name of the emitting service, stamped into every envelope
    pub source: String,

    /// JetStream stream holding all sticker event subjects
    pub stream_name: String,

    /// Optional subject namespace prepended to every channel
    ///
    /// Empty by default; set per-test to isolate streams.
    #[serde(default)]
    pub subject_prefix: String,

    /// Stream storage backend
    #[serde(default)]
    pub storage: StorageType,

    /// Maximum messages retained in the stream
    pub max_events: i64,

    /// Maximum message age in seconds (0 = unlimited)
    pub max_age_secs: u64,

    /// Maximum stream size in bytes (-1 = unlimited)
    pub max_bytes: i64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Optional auth token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://127.0.0.1:4222".to_string(),
            source: "stickerlandia".to_string(),
            stream_name: "STICKER_EVENTS".to_string(),
            subject_prefix: String::new(),
            storage: StorageType::File,
            max_events: 100_000,
            max_age_secs: 604_800,
            max_bytes: -1,
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
            token: None,
        }
    }
}

impl NatsConfig {
    /// Full subject for a channel, honoring the configured prefix
    pub fn subject(&self, channel: &str) -> String {
        if self.subject_prefix.is_empty() {
            channel.to_string()
        } else {
            format!("{}.{}", self.subject_prefix, channel)
        }
    }

    /// Subjects bound to the JetStream stream
    pub fn stream_subjects(&self) -> Vec<String> {
        vec![self.subject("stickers.>")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_without_prefix() {
        let config = NatsConfig::default();
        assert_eq!(config.subject("stickers.added"), "stickers.added");
        assert_eq!(config.stream_subjects(), vec!["stickers.>"]);
    }

    #[test]
    fn test_subject_with_prefix() {
        let config = NatsConfig {
            subject_prefix: "test.award".to_string(),
            ..Default::default()
        };
        assert_eq!(config.subject("stickers.claimed"), "test.award.stickers.claimed");
        assert_eq!(config.stream_subjects(), vec!["test.award.stickers.>"]);
    }
}
