//! Event bus wire client — batch entry submission over HTTP

use super::config::BusConfig;
use crate::error::{EventError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single named detail entry submitted to the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusEntry {
    /// Emitting service name, used by consumers for routing rules
    pub source: String,

    /// Per-fact routing key (e.g., "stickers.added")
    pub detail_type: String,

    /// Serialized CloudEvents envelope
    pub detail: String,

    /// Target bus name
    pub event_bus_name: String,
}

/// A batch of entries submitted in one request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusSubmission {
    pub entries: Vec<BusEntry>,
}

/// Per-entry result in the bus response
///
/// Successful entries carry an `eventId`; failed entries carry an
/// `errorCode` and `errorMessage` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusResultEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Structured response to a batch submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusResponse {
    #[serde(default)]
    pub failed_entry_count: u32,
    #[serde(default)]
    pub entries: Vec<BusResultEntry>,
}

/// Wire client for the batch-event-submission API
///
/// Seam between the publisher and the transport; tests substitute a
/// scripted implementation to simulate send failures and rejections.
#[async_trait]
pub trait BusApi: Send + Sync {
    /// Submit a batch of entries, returning the per-entry results
    async fn put_events(&self, submission: BusSubmission) -> Result<BusResponse>;
}

/// HTTP implementation of [`BusApi`]
pub struct HttpBusClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpBusClient {
    /// Build the HTTP client, validating the configured endpoint
    pub fn new(config: &BusConfig) -> Result<Self> {
        let endpoint = reqwest::Url::parse(&config.endpoint).map_err(|e| {
            EventError::Config(format!(
                "Invalid event bus endpoint '{}': {}",
                config.endpoint, e
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| EventError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl BusApi for HttpBusClient {
    async fn put_events(&self, submission: BusSubmission) -> Result<BusResponse> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&submission)
            .send()
            .await
            .map_err(|e| EventError::Connection(format!("Event bus request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EventError::Connection(format!(
                "Event bus returned {}: {}",
                status, body
            )));
        }

        response
            .json::<BusResponse>()
            .await
            .map_err(|e| EventError::Connection(format!("Invalid event bus response: {}", e)))
    }
}
