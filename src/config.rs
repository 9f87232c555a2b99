//! Transport selection and process-wide publisher installation
//!
//! The transport is chosen exactly once, at startup, from a single
//! configuration value. An unrecognized value or an unreachable transport
//! aborts startup — there is no silent fallback and no re-selection at
//! runtime.

use crate::error::{EventError, Result};
use crate::publisher::bus::{BusConfig, BusPublisher};
use crate::publisher::nats::{NatsConfig, NatsPublisher};
use crate::publisher::EventPublisher;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Supported messaging transports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// NATS JetStream streaming broker
    #[default]
    Nats,
    /// Batch event bus (PutEvents-style HTTP API)
    EventBus,
}

impl FromStr for Transport {
    type Err = EventError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "nats" => Ok(Transport::Nats),
            "eventbus" => Ok(Transport::EventBus),
            other => Err(EventError::Config(format!(
                "Unsupported messaging transport: {} (supported: nats, eventbus)",
                other
            ))),
        }
    }
}

/// Combined messaging configuration for both transports
///
/// Only the section matching `transport` is consulted when the publisher
/// is created.
#[derive(Debug, Clone, Default)]
pub struct MessagingConfig {
    pub transport: Transport,
    pub nats: NatsConfig,
    pub bus: BusConfig,
}

impl MessagingConfig {
    /// Read the messaging configuration from the environment
    ///
    /// Keys: `MESSAGING_TRANSPORT` (default "nats"), `EVENT_SOURCE`,
    /// `NATS_URL`, `EVENT_BUS_NAME`, `EVENT_BUS_ENDPOINT`. An unrecognized
    /// transport value is a startup error.
    pub fn from_env() -> Result<Self> {
        let transport = match std::env::var("MESSAGING_TRANSPORT") {
            Ok(value) => value.parse()?,
            Err(_) => Transport::default(),
        };

        let source =
            std::env::var("EVENT_SOURCE").unwrap_or_else(|_| "stickerlandia".to_string());

        let mut nats = NatsConfig {
            source: source.clone(),
            ..Default::default()
        };
        if let Ok(url) = std::env::var("NATS_URL") {
            nats.url = url;
        }

        let mut bus = BusConfig {
            source,
            ..Default::default()
        };
        if let Ok(name) = std::env::var("EVENT_BUS_NAME") {
            bus.bus_name = name;
        }
        if let Ok(endpoint) = std::env::var("EVENT_BUS_ENDPOINT") {
            bus.endpoint = endpoint;
        }

        Ok(Self {
            transport,
            nats,
            bus,
        })
    }
}

/// Instantiate the configured transport adapter
///
/// Evaluated once at startup. Fails fast when the selected transport's
/// client cannot be constructed (unreachable broker, missing bus settings).
pub async fn create_publisher(config: &MessagingConfig) -> Result<Arc<dyn EventPublisher>> {
    tracing::info!(transport = ?config.transport, "Selecting messaging transport");

    match config.transport {
        Transport::Nats => {
            let publisher = NatsPublisher::connect(config.nats.clone()).await?;
            tracing::info!("Using NATS event publisher");
            Ok(Arc::new(publisher))
        }
        Transport::EventBus => {
            let publisher = BusPublisher::new(config.bus.clone())?;
            tracing::info!("Using event bus publisher");
            Ok(Arc::new(publisher))
        }
    }
}

static SHARED: OnceCell<Arc<dyn EventPublisher>> = OnceCell::const_new();

/// Install the process-wide publisher, creating it on first call
///
/// Subsequent calls return the already-installed instance; the adapter is
/// shared by all callers for the process lifetime.
pub async fn init(config: MessagingConfig) -> Result<Arc<dyn EventPublisher>> {
    SHARED
        .get_or_try_init(|| create_publisher(&config))
        .await
        .cloned()
}

/// The installed publisher, if [`init`] has completed
pub fn shared() -> Option<Arc<dyn EventPublisher>> {
    SHARED.get().cloned()
}
