//! Record: the persisted entity the batch processor walks over.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Initial status of a freshly created record.
pub const STATUS_NEW: &str = "NEW";

/// Terminal status written by the batch processor.
pub const STATUS_PROCESSED: &str = "PROCESSED";

/// A stored record.
///
/// `status` is free-form on purpose: other workflows may write their own
/// values. This crate only knows `NEW` and `PROCESSED`, and only ever moves
/// a record forward to `PROCESSED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub status: String,
    pub email: String,
}

impl Record {
    /// Attach a store-assigned id to a draft.
    pub fn from_draft(id: RecordId, draft: NewRecord) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            email: draft.email,
        }
    }

    pub fn is_processed(&self) -> bool {
        self.status == STATUS_PROCESSED
    }

    /// Move the record to `PROCESSED`.
    ///
    /// Returns `false` when the record already was processed (nothing changed).
    pub fn mark_processed(&mut self) -> bool {
        if self.is_processed() {
            return false;
        }
        self.status = STATUS_PROCESSED.to_string();
        true
    }
}

/// Record contents before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub name: String,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub email: String,
}

fn default_status() -> String {
    STATUS_NEW.to_string()
}

impl NewRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: default_status(),
            email: email.into(),
        }
    }
}
