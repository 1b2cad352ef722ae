//! InMemoryRecordStore - 開発用・テスト用の record store

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{NewRecord, Record, RecordId, StoreError};
use crate::ports::RecordStore;

/// In-memory store state.
struct InMemoryStoreState {
    records: BTreeMap<RecordId, Record>,

    /// Next id to assign.
    next_id: RecordId,
}

impl InMemoryStoreState {
    fn allocate_id(&mut self) -> RecordId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }
}

/// InMemoryRecordStore keeps records in a `BTreeMap`, so `list_ids` comes
/// back in ascending id order. Ids start at 1 and are never reused.
///
/// The lock is only held for the map operation itself, never across an
/// await.
pub struct InMemoryRecordStore {
    state: Mutex<InMemoryStoreState>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryStoreState {
                records: BTreeMap::new(),
                next_id: RecordId::new(1),
            }),
        }
    }

    /// Build a store and create every draft in order.
    pub async fn seeded(drafts: impl IntoIterator<Item = NewRecord>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().await;
            for draft in drafts {
                let id = state.allocate_id();
                state.records.insert(id, Record::from_draft(id, draft));
            }
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.records.keys().copied().collect())
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.records.get(&id).cloned())
    }

    async fn update(&self, record: Record) -> Result<Record, StoreError> {
        let mut state = self.state.lock().await;
        let Some(slot) = state.records.get_mut(&record.id) else {
            return Err(StoreError::NotFound(record.id));
        };
        *slot = record.clone();
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<Record>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.records.values().cloned().collect())
    }

    async fn create(&self, draft: NewRecord) -> Result<Record, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.allocate_id();
        let record = Record::from_draft(id, draft);
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        match state.records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id)),
        }
    }
}
