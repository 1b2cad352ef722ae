//! RecordStore port - the persistent store the processor runs against.
//!
//! The batch processor only depends on `list_ids`, `get` and `update`.
//! The remaining CRUD operations exist for the service façade and for
//! seeding stores in tests and the CLI.

use async_trait::async_trait;

use crate::domain::{NewRecord, Record, RecordId, StoreError};

/// RecordStore は record の正本（source of truth）
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数の worker から同時に呼ばれる）
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every stored id. Read once at the start of a batch.
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError>;

    /// Fetch one record. `Ok(None)` when the id does not resolve.
    async fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError>;

    /// Persist a record that already has an id; returns what was stored.
    async fn update(&self, record: Record) -> Result<Record, StoreError>;

    async fn list_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Insert a draft; the store assigns the id.
    async fn create(&self, draft: NewRecord) -> Result<Record, StoreError>;

    async fn delete(&self, id: RecordId) -> Result<(), StoreError>;
}
