//! Publisher port — the only abstraction call sites depend on
//!
//! One fire-and-continue method per business fact. The caller's transaction
//! has already committed before a publish is invoked, so failures are
//! terminal here: logged, surfaced through the [`PublishHandle`], and never
//! re-thrown synchronously.

use crate::error::{EventError, Result};
use crate::trace::TraceContext;
use chrono::{DateTime, Utc};
use std::future::Future;
use tokio::task::JoinHandle;

pub mod bus;
pub mod nats;

/// Terminal outcome of a publish call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The transport accepted the event
    Sent,
    /// Nothing was sent (caller misuse, e.g. removal without a timestamp)
    Skipped,
}

/// Completion handle for an in-flight publish
///
/// Awaiting the handle is optional; the send proceeds even if the handle is
/// dropped. Failures are only observable here — they never propagate back
/// into the caller's request path.
pub struct PublishHandle {
    inner: HandleInner,
}

enum HandleInner {
    Task(JoinHandle<Result<PublishOutcome>>),
    Ready(Result<PublishOutcome>),
}

impl PublishHandle {
    /// Spawn the transport send as a background task
    ///
    /// Success and failure are logged here so adapters report outcomes
    /// uniformly; the result is also carried by the handle for callers
    /// that choose to await it.
    pub(crate) fn dispatch(
        channel: &'static str,
        fut: impl Future<Output = Result<()>> + Send + 'static,
    ) -> Self {
        let task = tokio::spawn(async move {
            match fut.await {
                Ok(()) => Ok(PublishOutcome::Sent),
                Err(e) => {
                    tracing::error!(channel, error = %e, "Failed to publish event");
                    Err(e)
                }
            }
        });
        Self {
            inner: HandleInner::Task(task),
        }
    }

    /// An already-completed handle for a publish that sent nothing
    pub(crate) fn skipped() -> Self {
        Self {
            inner: HandleInner::Ready(Ok(PublishOutcome::Skipped)),
        }
    }

    /// Await the terminal outcome of this publish
    pub async fn wait(self) -> Result<PublishOutcome> {
        match self.inner {
            HandleInner::Task(task) => task
                .await
                .map_err(|e| EventError::Task(e.to_string()))?,
            HandleInner::Ready(result) => result,
        }
    }
}

/// Transport-agnostic publisher for sticker domain events
///
/// Each method accepts only plain values (never entity references) and
/// returns immediately with a [`PublishHandle`]. Implementations must catch
/// all transport-level errors internally.
pub trait EventPublisher: Send + Sync {
    /// Publish a sticker added event when a new sticker is created in the catalogue
    fn publish_sticker_added(
        &self,
        sticker_id: &str,
        name: &str,
        description: &str,
        category: Option<&str>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle;

    /// Publish a sticker updated event when an existing sticker is modified
    fn publish_sticker_updated(
        &self,
        sticker_id: &str,
        name: &str,
        description: &str,
        category: Option<&str>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle;

    /// Publish a sticker deleted event when a sticker is removed from the catalogue
    fn publish_sticker_deleted(
        &self,
        sticker_id: &str,
        name: &str,
        trace: Option<&TraceContext>,
    ) -> PublishHandle;

    /// Publish a sticker assigned event when a sticker is assigned to a user
    fn publish_sticker_assigned(
        &self,
        account_id: &str,
        sticker_id: &str,
        assigned_at: DateTime<Utc>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle;

    /// Publish a sticker removed event when a sticker is removed from a user
    ///
    /// `removed_at` must be set; an active assignment has no removal event.
    /// Passing `None` logs a warning and sends nothing.
    fn publish_sticker_removed(
        &self,
        account_id: &str,
        sticker_id: &str,
        removed_at: Option<DateTime<Utc>>,
        trace: Option<&TraceContext>,
    ) -> PublishHandle;

    /// Publish a sticker claimed event for the user-management service
    fn publish_sticker_claimed(
        &self,
        account_id: &str,
        sticker_id: &str,
        trace: Option<&TraceContext>,
    ) -> PublishHandle;

    /// Publish the assigned and claimed events for one award
    ///
    /// The two publishes are independent: a failure in one never prevents
    /// the other from being attempted.
    fn publish_sticker_awarded(
        &self,
        account_id: &str,
        sticker_id: &str,
        assigned_at: DateTime<Utc>,
        trace: Option<&TraceContext>,
    ) -> (PublishHandle, PublishHandle) {
        let assigned = self.publish_sticker_assigned(account_id, sticker_id, assigned_at, trace);
        let claimed = self.publish_sticker_claimed(account_id, sticker_id, trace);
        (assigned, claimed)
    }
}

/// Payload construction shared by all transport adapters
pub(crate) mod payloads {
    use crate::events::*;
    use chrono::{DateTime, Utc};

    pub(crate) fn added(
        sticker_id: &str,
        name: &str,
        description: &str,
        category: Option<&str>,
    ) -> StickerAdded {
        StickerAdded {
            sticker_id: sticker_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.map(str::to_string),
            added_at: Utc::now(),
        }
    }

    pub(crate) fn updated(
        sticker_id: &str,
        name: &str,
        description: &str,
        category: Option<&str>,
    ) -> StickerUpdated {
        StickerUpdated {
            sticker_id: sticker_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn deleted(sticker_id: &str, name: &str) -> StickerDeleted {
        StickerDeleted {
            sticker_id: sticker_id.to_string(),
            name: name.to_string(),
            deleted_at: Utc::now(),
        }
    }

    pub(crate) fn assigned(
        account_id: &str,
        sticker_id: &str,
        assigned_at: DateTime<Utc>,
    ) -> StickerAssigned {
        StickerAssigned {
            account_id: account_id.to_string(),
            sticker_id: sticker_id.to_string(),
            assigned_at,
        }
    }

    /// Build a removal payload, refusing active assignments
    ///
    /// Returns `None` and logs a warning when no removal timestamp is set —
    /// a caller defect, not a transport condition.
    pub(crate) fn removed(
        account_id: &str,
        sticker_id: &str,
        removed_at: Option<DateTime<Utc>>,
    ) -> Option<StickerRemoved> {
        let Some(removed_at) = removed_at else {
            tracing::warn!(
                account_id,
                sticker_id,
                "Cannot publish removal event for active assignment"
            );
            return None;
        };
        Some(StickerRemoved {
            account_id: account_id.to_string(),
            sticker_id: sticker_id.to_string(),
            removed_at,
        })
    }

    pub(crate) fn claimed(account_id: &str, sticker_id: &str) -> StickerClaimed {
        StickerClaimed {
            account_id: account_id.to_string(),
            sticker_id: sticker_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skipped_handle_resolves_without_runtime_task() {
        let handle = PublishHandle::skipped();
        assert_eq!(handle.wait().await.unwrap(), PublishOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_dispatch_reports_success() {
        let handle = PublishHandle::dispatch("stickers.added", async { Ok(()) });
        assert_eq!(handle.wait().await.unwrap(), PublishOutcome::Sent);
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_failure_via_handle() {
        let handle = PublishHandle::dispatch("stickers.added", async {
            Err(EventError::Connection("broker unreachable".to_string()))
        });
        let err = handle.wait().await.unwrap_err();
        assert!(matches!(err, EventError::Connection(_)));
    }

    #[tokio::test]
    async fn test_send_proceeds_when_handle_dropped() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let handle = PublishHandle::dispatch("stickers.claimed", async move {
            let _ = tx.send(());
            Ok(())
        });
        drop(handle);
        tokio::time::timeout(std::time::Duration::from_secs(1), rx)
            .await
            .expect("publish task should run after handle drop")
            .unwrap();
    }

    #[test]
    fn test_removed_payload_requires_timestamp() {
        assert!(payloads::removed("acct-1", "st-1", None).is_none());

        let payload = payloads::removed("acct-1", "st-1", Some(chrono::Utc::now())).unwrap();
        assert_eq!(payload.account_id, "acct-1");
        assert_eq!(payload.sticker_id, "st-1");
    }

    #[test]
    fn test_assigned_and_claimed_share_identifiers() {
        let assigned = payloads::assigned("acct-7", "st-2", chrono::Utc::now());
        let claimed = payloads::claimed("acct-7", "st-2");
        assert_eq!(assigned.account_id, claimed.account_id);
        assert_eq!(assigned.sticker_id, claimed.sticker_id);
    }
}
