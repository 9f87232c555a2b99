//! Business fact payloads carried inside event envelopes
//!
//! One immutable record per fact, holding only identifiers, human-readable
//! fields, and the fact-specific timestamp. All types use camelCase JSON
//! serialization for wire compatibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A new sticker was created in the catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerAdded {
    pub sticker_id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl StickerAdded {
    pub const EVENT_TYPE: &'static str = "stickers.added.v1";
    pub const CHANNEL: &'static str = "stickers.added";
}

/// An existing catalogue sticker was modified
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerUpdated {
    pub sticker_id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl StickerUpdated {
    pub const EVENT_TYPE: &'static str = "stickers.updated.v1";
    pub const CHANNEL: &'static str = "stickers.updated";
}

/// A sticker was removed from the catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerDeleted {
    pub sticker_id: String,
    pub name: String,
    pub deleted_at: DateTime<Utc>,
}

impl StickerDeleted {
    pub const EVENT_TYPE: &'static str = "stickers.deleted.v1";
    pub const CHANNEL: &'static str = "stickers.deleted";
}

/// A sticker was assigned to a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerAssigned {
    pub account_id: String,
    pub sticker_id: String,
    pub assigned_at: DateTime<Utc>,
}

impl StickerAssigned {
    pub const EVENT_TYPE: &'static str = "stickers.assigned.v1";
    pub const CHANNEL: &'static str = "stickers.assigned";
}

/// A sticker was removed from a user account
///
/// Only ever constructed when the removal timestamp is already known;
/// the publisher refuses to build one from an active assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerRemoved {
    pub account_id: String,
    pub sticker_id: String,
    pub removed_at: DateTime<Utc>,
}

impl StickerRemoved {
    pub const EVENT_TYPE: &'static str = "stickers.removed.v1";
    pub const CHANNEL: &'static str = "stickers.removed";
}

/// A user claimed a sticker (consumed by user-management to bump the claim count)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerClaimed {
    pub account_id: String,
    pub sticker_id: String,
}

impl StickerClaimed {
    pub const EVENT_TYPE: &'static str = "stickers.claimed.v1";
    pub const CHANNEL: &'static str = "stickers.claimed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_serialization() {
        let payload = StickerAdded {
            sticker_id: "st-1".to_string(),
            name: "Gold Star".to_string(),
            description: "Shiny".to_string(),
            category: Some("achievement".to_string()),
            added_at: Utc::now(),
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"stickerId\":\"st-1\""));
        assert!(json.contains("\"category\":\"achievement\""));
        assert!(json.contains("\"addedAt\""));
    }

    #[test]
    fn test_added_omits_missing_category() {
        let payload = StickerAdded {
            sticker_id: "st-1".to_string(),
            name: "Gold Star".to_string(),
            description: "Shiny".to_string(),
            category: None,
            added_at: Utc::now(),
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("category"));
    }

    #[test]
    fn test_removed_serialization_roundtrip() {
        let payload = StickerRemoved {
            account_id: "acct-9".to_string(),
            sticker_id: "st-3".to_string(),
            removed_at: Utc::now(),
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"accountId\":\"acct-9\""));
        assert!(json.contains("\"removedAt\""));

        let parsed: StickerRemoved = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.account_id, payload.account_id);
        assert_eq!(parsed.removed_at, payload.removed_at);
    }

    #[test]
    fn test_event_types_are_versioned() {
        for event_type in [
            StickerAdded::EVENT_TYPE,
            StickerUpdated::EVENT_TYPE,
            StickerDeleted::EVENT_TYPE,
            StickerAssigned::EVENT_TYPE,
            StickerRemoved::EVENT_TYPE,
            StickerClaimed::EVENT_TYPE,
        ] {
            assert!(event_type.starts_with("stickers."));
            assert!(event_type.ends_with(".v1"));
        }
    }
}
