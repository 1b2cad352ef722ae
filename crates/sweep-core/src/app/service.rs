//! RecordService - CRUD façade plus the batch entry point.
//!
//! This is the surface a routing layer calls into. Store errors on single
//! record operations are returned as they are; missing records become
//! `ServiceError::NotFound`.

use std::sync::Arc;

use tracing::info;

use crate::app::dispatcher::{BatchHandle, BatchProcessor};
use crate::domain::{NewRecord, Record, RecordId, ServiceError, StoreError};
use crate::ports::RecordStore;

pub struct RecordService {
    store: Arc<dyn RecordStore>,
    processor: BatchProcessor,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>, processor: BatchProcessor) -> Self {
        Self { store, processor }
    }

    pub async fn find_all(&self) -> Result<Vec<Record>, ServiceError> {
        Ok(self.store.list_all().await?)
    }

    pub async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn create(&self, draft: NewRecord) -> Result<Record, ServiceError> {
        let record = self.store.create(draft).await?;
        info!(record_id = %record.id, "record created");
        Ok(record)
    }

    /// Overwrite an existing record's contents, keeping its id.
    pub async fn replace(&self, id: RecordId, draft: NewRecord) -> Result<Record, ServiceError> {
        if self.store.get(id).await?.is_none() {
            return Err(ServiceError::NotFound(id));
        }
        match self.store.update(Record::from_draft(id, draft)).await {
            Ok(record) => Ok(record),
            // deleted between the check and the write
            Err(StoreError::NotFound(id)) => Err(ServiceError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), ServiceError> {
        match self.store.delete(id).await {
            Ok(()) => {
                info!(record_id = %id, "record deleted");
                Ok(())
            }
            Err(StoreError::NotFound(id)) => Err(ServiceError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Process every stored record; see `BatchProcessor::process_all`.
    pub async fn process_all(&self) -> Result<BatchHandle, ServiceError> {
        Ok(self.processor.process_all().await?)
    }
}
