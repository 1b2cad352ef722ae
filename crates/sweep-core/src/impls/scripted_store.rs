//! ScriptedStore - fault-injecting decorator used by the tests.
//!
//! Wraps another store and, per id, fails `get`/`update`, panics in `get`,
//! runs a hook in `get`, or overrides the id list handed out by `list_ids`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{NewRecord, Record, RecordId, StoreError};
use crate::ports::RecordStore;

pub struct ScriptedStore {
    inner: Arc<dyn RecordStore>,
    batch: Option<Vec<RecordId>>,
    failing_gets: HashSet<RecordId>,
    failing_updates: HashSet<RecordId>,
    panicking_gets: HashSet<RecordId>,
    get_hooks: HashMap<RecordId, GetHook>,
}

type GetHook = Arc<dyn Fn() + Send + Sync>;

impl ScriptedStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            batch: None,
            failing_gets: HashSet::new(),
            failing_updates: HashSet::new(),
            panicking_gets: HashSet::new(),
            get_hooks: HashMap::new(),
        }
    }

    /// Hand out exactly these ids from `list_ids`.
    pub fn with_batch(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.batch = Some(ids.into_iter().map(RecordId::new).collect());
        self
    }

    pub fn failing_get(mut self, id: RecordId) -> Self {
        self.failing_gets.insert(id);
        self
    }

    pub fn failing_update(mut self, id: RecordId) -> Self {
        self.failing_updates.insert(id);
        self
    }

    pub fn panicking_get(mut self, id: RecordId) -> Self {
        self.panicking_gets.insert(id);
        self
    }

    /// Run `hook` every time `get` is called for `id`.
    pub fn on_get(mut self, id: RecordId, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.get_hooks.insert(id, Arc::new(hook));
        self
    }

    fn scripted_failure() -> StoreError {
        StoreError::Unavailable("scripted failure".to_string())
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn list_ids(&self) -> Result<Vec<RecordId>, StoreError> {
        match &self.batch {
            Some(ids) => Ok(ids.clone()),
            None => self.inner.list_ids().await,
        }
    }

    async fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        if let Some(hook) = self.get_hooks.get(&id) {
            hook();
        }
        if self.panicking_gets.contains(&id) {
            panic!("scripted panic for {id}");
        }
        if self.failing_gets.contains(&id) {
            return Err(Self::scripted_failure());
        }
        self.inner.get(id).await
    }

    async fn update(&self, record: Record) -> Result<Record, StoreError> {
        if self.failing_updates.contains(&record.id) {
            return Err(Self::scripted_failure());
        }
        self.inner.update(record).await
    }

    async fn list_all(&self) -> Result<Vec<Record>, StoreError> {
        self.inner.list_all().await
    }

    async fn create(&self, draft: NewRecord) -> Result<Record, StoreError> {
        self.inner.create(draft).await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }
}
