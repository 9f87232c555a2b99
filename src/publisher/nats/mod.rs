//! NATS JetStream transport adapter
//!
//! Publishes each business fact as a CloudEvents envelope to its own
//! subject (`stickers.added`, `stickers.assigned`, ...), awaiting the
//! JetStream ack inside the background publish task.

mod config;

pub use config::{NatsConfig, StorageType};

use crate::envelope::Envelope;
use crate::error::{EventError, Result};
use crate::events::{
    StickerAdded, StickerAssigned, StickerClaimed, StickerDeleted, StickerRemoved, StickerUpdated,
};
use crate::publisher::{payloads, EventPublisher, PublishHandle};
use crate::trace::TraceContext;
use async_nats::jetstream;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Streaming-broker implementation of [`EventPublisher`]
///
/// Stateless per call; a single instance is shared read-only by all
/// concurrent callers. Active only when the transport selector resolves
/// `nats`.
pub struct NatsPublisher {
    client: async_nats::Client,
    jetstream: jetstream::Context,
    config: Arc<NatsConfig>,
}

impl NatsPublisher {
    /// Connect to NATS and ensure the sticker event stream exists
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        let connect_opts = build_connect_options(&config);

        let client = connect_opts
            .connect(&config.url)
            .await
            .map_err(|e| EventError::Connection(format!("{}: {}", config.url, e)))?;

        tracing::info!(url = %config.url, "Connected to NATS");

        let jetstream = jetstream::new(client.clone());
        ensure_stream(&jetstream, &config).await?;

        Ok(Self {
            client,
            jetstream,
            config: Arc::new(config),
        })
    }

    /// Get the underlying NATS client
    pub fn nats_client(&self) -> &async_nats::Client {
        &self.client
    }

    /// Get the configuration
    pub fn config(&self) -> &NatsConfig {
        &self.config
    }

    /// Wrap, serialize, and ship one payload on its channel
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
        let js = self.jetstream.clone();
        let source = self.config.source.clone();
        let subject = self.config.subject(channel);
        let trace = trace.cloned();

        PublishHandle::dispatch(channel, async move {
            let envelope = Envelope::wrap(event_type, source, payload).with_trace(trace.as_ref());
            let bytes = serde_json::to_vec(&envelope)?;

            let ack = js
                .publish(subject.clone(), bytes.into())
                .await
                .map_err(|e| EventError::Publish {
                    channel: subject.clone(),
                    reason: e.to_string(),
                })?
                .await
                .map_err(|e| EventError::Publish {
                    channel: subject.clone(),
                    reason: format!("ack failed: {}", e),
                })?;

            tracing::debug!(
                event_id = %envelope.id,
                subject = %subject,
                sequence = ack.sequence,
                "Event published"
            );

            Ok(())
        })
    }
}

impl EventPublisher for NatsPublisher {
    fn publish_sticker_added(
        &self,
        sticker_id: &str,
        name: &str,
        description: &str,
        category: Option<&str>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle {
        tracing::info!(sticker_id, "Publishing sticker added event to NATS");
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
        tracing::info!(sticker_id, "Publishing sticker updated event to NATS");
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
        tracing::info!(sticker_id, "Publishing sticker deleted event to NATS");
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
        tracing::info!(account_id, sticker_id, "Publishing sticker assigned event to NATS");
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
        tracing::info!(account_id, sticker_id, "Publishing sticker removed event to NATS");
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
        tracing::info!(account_id, sticker_id, "Publishing sticker claimed event to NATS");
        let payload = payloads::claimed(account_id, sticker_id);
        self.dispatch(
            StickerClaimed::CHANNEL,
            StickerClaimed::EVENT_TYPE,
            payload,
            trace,
        )
    }
}

/// Build NATS connect options from config
fn build_connect_options(config: &NatsConfig) -> async_nats::ConnectOptions {
    let mut opts = async_nats::ConnectOptions::new()
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .request_timeout(Some(Duration::from_secs(config.request_timeout_secs)));

    if let Some(ref token) = config.token {
        opts = opts.token(token.clone());
    }

    opts
}

/// Ensure the JetStream stream exists with the correct configuration
async fn ensure_stream(js: &jetstream::Context, config: &NatsConfig) -> Result<()> {
    let storage = match config.storage {
        StorageType::File => jetstream::stream::StorageType::File,
        StorageType::Memory => jetstream::stream::StorageType::Memory,
    };

    let max_age = if config.max_age_secs > 0 {
        Duration::from_secs(config.max_age_secs)
    } else {
        Duration::ZERO
    };

    let stream_config = jetstream::stream::Config {
        name: config.stream_name.clone(),
        subjects: config.stream_subjects(),
        storage,
        max_messages: config.max_events,
        max_age,
        max_bytes: config.max_bytes,
        retention: jetstream::stream::RetentionPolicy::Limits,
        ..Default::default()
    };

    js.get_or_create_stream(stream_config)
        .await
        .map_err(|e| {
            EventError::Stream(format!(
                "Failed to create/get stream '{}': {}",
                config.stream_name, e
            ))
        })?;

    tracing::info!(
        stream = %config.stream_name,
        subjects = ?config.stream_subjects(),
        "JetStream stream ready"
    );

    Ok(())
}
