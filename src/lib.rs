//! # stickerlandia-events
//!
//! Transport-agnostic CloudEvents publishing for the Stickerlandia sticker
//! services.
//!
//! ## Overview
//!
//! `stickerlandia-events` wraps sticker domain facts (added, updated,
//! deleted, assigned, removed, claimed) in CloudEvents envelopes with W3C
//! trace context and ships them over a transport chosen once at startup.
//! Call sites depend only on the [`EventPublisher`] port; the active
//! transport is invisible to them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stickerlandia_events::{EventPublisher, MessagingConfig, create_publisher};
//!
//! # async fn example() -> stickerlandia_events::Result<()> {
//! // Select the transport once, at process start
//! let config = MessagingConfig::from_env()?;
//! let publisher = create_publisher(&config).await?;
//!
//! // After the business transaction commits, publish and move on
//! let handle = publisher.publish_sticker_added(
//!     "st-42",
//!     "Gold Star",
//!     "Awarded for shipping",
//!     Some("achievement"),
//!     None,
//! );
//!
//! // Awaiting the outcome is optional
//! handle.wait().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Transports
//!
//! - **nats** — NATS JetStream, one subject per fact
//! - **eventbus** — batch entry submission to a PutEvents-style HTTP bus
//!
//! ## Architecture
//!
//! - **EventPublisher** trait — the port all call sites depend on
//! - **Envelope** — CloudEvents v1.0 wrapper with `traceparent` support
//! - **PublishHandle** — optional-to-await completion handle; publish
//!   failures never propagate into the caller's request path
//! - **Transport selector** — one configuration value, one adapter
//!   instance per process, fail-fast on misconfiguration

pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod publisher;
pub mod trace;

// Re-export core types
pub use config::{create_publisher, init, shared, MessagingConfig, Transport};
pub use envelope::Envelope;
pub use error::{EventError, Result};
pub use events::{
    StickerAdded, StickerAssigned, StickerClaimed, StickerDeleted, StickerRemoved, StickerUpdated,
};
pub use publisher::{EventPublisher, PublishHandle, PublishOutcome};
pub use trace::TraceContext;

// Re-export transport adapters for convenience
pub use publisher::bus::{BusApi, BusConfig, BusPublisher, HttpBusClient};
pub use publisher::nats::{NatsConfig, NatsPublisher, StorageType};
