//! Batch event bus transport adapter
//!
//! Submits each fact as a single named detail entry to a PutEvents-style
//! bus API and inspects the structured response for rejected entries.
//! Failures are reported through the completion handle, matching the
//! streaming adapter's contract.

mod client;
mod config;

pub use client::{BusApi, BusEntry, BusResponse, BusResultEntry, BusSubmission, HttpBusClient};
pub use config::BusConfig;

use crate::envelope::Envelope;
use crate::error::{EventError, Result};
use crate::events::{
    StickerAdded, StickerAssigned, StickerClaimed, StickerDeleted, StickerRemoved, StickerUpdated,
};
use crate::publisher::{payloads, EventPublisher, PublishHandle};
use crate::trace::TraceContext;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Event-bus implementation of [`EventPublisher`]
///
/// Active only when the transport selector resolves `eventbus`.
pub struct BusPublisher {
    api: Arc<dyn BusApi>,
    config: Arc<BusConfig>,
}

impl BusPublisher {
    /// Build the publisher over the HTTP bus client, failing fast on
    /// missing or malformed connection settings
    pub fn new(config: BusConfig) -> Result<Self> {
        if config.bus_name.is_empty() {
            return Err(EventError::Config(
                "Event bus name is required but not configured (EVENT_BUS_NAME)".to_string(),
            ));
        }
        if config.endpoint.is_empty() {
            return Err(EventError::Config(
                "Event bus endpoint is required but not configured (EVENT_BUS_ENDPOINT)"
                    .to_string(),
            ));
        }

        let client = HttpBusClient::new(&config)?;

        tracing::info!(
            bus = %config.bus_name,
            endpoint = %config.endpoint,
            "Event bus publisher created"
        );

        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Build the publisher over a caller-supplied wire client
    pub fn with_client(api: Arc<dyn BusApi>, config: BusConfig) -> Self {
        Self {
            api,
            config: Arc::new(config),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Wrap, serialize, and submit one payload as a bus entry
    fn dispatch<T>(
        &self,
        channel: &'static str,
        event_type: &'static str,
        payload: T,
        trace: Option<&TraceContext>,
    ) -> PublishHandle
    where
        T: Serialize + Send + 'static,
    {
        let api = self.api.clone();
        let config = self.config.clone();
        let trace = trace.cloned();

        PublishHandle::dispatch(channel, async move {
            let envelope =
                Envelope::wrap(event_type, config.source.clone(), payload).with_trace(trace.as_ref());
            let detail = serde_json::to_string(&envelope)?;

            let entry = BusEntry {
                source: config.source.clone(),
                detail_type: channel.to_string(),
                detail,
                event_bus_name: config.bus_name.clone(),
            };

            let response = api
                .put_events(BusSubmission {
                    entries: vec![entry],
                })
                .await?;

            if response.failed_entry_count > 0 {
                for failed in response.entries.iter().filter(|e| e.error_code.is_some()) {
                    tracing::error!(
                        channel,
                        error_code = failed.error_code.as_deref().unwrap_or(""),
                        error_message = failed.error_message.as_deref().unwrap_or(""),
                        "Event bus error"
                    );
                }
                let reason = response
                    .entries
                    .iter()
                    .find_map(|e| e.error_code.clone())
                    .unwrap_or_else(|| "unknown error".to_string());
                return Err(EventError::BusRejected {
                    channel: channel.to_string(),
                    reason,
                });
            }

            tracing::debug!(
                channel,
                envelope_id = %envelope.id,
                bus_event_id = response
                    .entries
                    .first()
                    .and_then(|e| e.event_id.as_deref())
                    .unwrap_or(""),
                "Event published to bus"
            );

            Ok(())
        })
    }
}

impl EventPublisher for BusPublisher {
    fn publish_sticker_added(
        &self,
        sticker_id: &str,
        name: &str,
        description: &str,
        category: Option<&str>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle {
        tracing::info!(sticker_id, "Publishing sticker added event to bus");
        let payload = payloads::added(sticker_id, name, description, category);
        self.dispatch(StickerAdded::CHANNEL, StickerAdded::EVENT_TYPE, payload, trace)
    }

    fn publish_sticker_updated(
        &self,
        sticker_id: &str,
        name: &str,
        description: &str,
        category: Option<&str>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle {
        tracing::info!(sticker_id, "Publishing sticker updated event to bus");
        let payload = payloads::updated(sticker_id, name, description, category);
        self.dispatch(
            StickerUpdated::CHANNEL,
            StickerUpdated::EVENT_TYPE,
            payload,
            trace,
        )
    }

    fn publish_sticker_deleted(
        &self,
        sticker_id: &str,
        name: &str,
        trace: Option<&TraceContext>,
    ) -> PublishHandle {
        tracing::info!(sticker_id, "Publishing sticker deleted event to bus");
        let payload = payloads::deleted(sticker_id, name);
        self.dispatch(
            StickerDeleted::CHANNEL,
            StickerDeleted::EVENT_TYPE,
            payload,
            trace,
        )
    }

    fn publish_sticker_assigned(
        &self,
        account_id: &str,
        sticker_id: &str,
        assigned_at: DateTime<Utc>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle {
        tracing::info!(account_id, sticker_id, "Publishing sticker assigned event to bus");
        let payload = payloads::assigned(account_id, sticker_id, assigned_at);
        self.dispatch(
            StickerAssigned::CHANNEL,
            StickerAssigned::EVENT_TYPE,
            payload,
            trace,
        )
    }

    fn publish_sticker_removed(
        &self,
        account_id: &str,
        sticker_id: &str,
        removed_at: Option<DateTime<Utc>>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle {
        let Some(payload) = payloads::removed(account_id, sticker_id, removed_at) else {
            return PublishHandle::skipped();
        };
        tracing::info!(account_id, sticker_id, "Publishing sticker removed event to bus");
        self.dispatch(
            StickerRemoved::CHANNEL,
            StickerRemoved::EVENT_TYPE,
            payload,
            trace,
        )
    }

    fn publish_sticker_claimed(
        &self,
        account_id: &str,
        sticker_id: &str,
        trace: Option<&TraceContext>,
    ) -> PublishHandle {
        tracing::info!(account_id, sticker_id, "Publishing sticker claimed event to bus");
        let payload = payloads::claimed(account_id, sticker_id);
        self.dispatch(
            StickerClaimed::CHANNEL,
            StickerClaimed::EVENT_TYPE,
            payload,
            trace,
        )
    }
}
