//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! The builder validates the configuration, creates the process-wide worker
//! pool, starts it, and wires store, processor and service together.
//! `App::shutdown` is the matching teardown.

use std::sync::Arc;

use tracing::info;

use crate::app::config::{ConfigError, ProcessorConfig};
use crate::app::dispatcher::BatchProcessor;
use crate::app::service::RecordService;
use crate::domain::{PoolError, PoolState};
use crate::pool::{ShutdownReport, WorkerPool};
use crate::ports::RecordStore;

/// AppBuilder はアプリケーションを構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .with_config(ProcessorConfig::from_env()?)
///     .with_store(Arc::new(InMemoryRecordStore::new()))
///     .build()?;
/// ```
pub struct AppBuilder {
    config: ProcessorConfig,
    store: Option<Arc<dyn RecordStore>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no record store configured")]
    MissingStore,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
            store: None,
        }
    }

    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate, start the worker pool, and wire the service.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<App, BuildError> {
        self.config.validate()?;
        let store = self.store.ok_or(BuildError::MissingStore)?;

        let pool = Arc::new(WorkerPool::new(self.config.worker_threads));
        pool.start()?;

        let processor = BatchProcessor::new(
            Arc::clone(&store),
            Arc::clone(&pool),
            self.config.work_delay(),
        );
        let service = RecordService::new(store, processor);

        info!(
            worker_threads = self.config.worker_threads,
            work_delay_ms = self.config.work_delay_ms,
            "app started"
        );

        Ok(App {
            config: self.config,
            pool,
            service,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App owns the worker pool for its whole lifetime.
pub struct App {
    config: ProcessorConfig,
    pool: Arc<WorkerPool>,
    service: RecordService,
}

impl App {
    pub fn service(&self) -> &RecordService {
        &self.service
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn pool_state(&self) -> PoolState {
        self.pool.state()
    }

    /// Drain the pool, bounded by the configured shutdown timeout.
    pub async fn shutdown(&self) -> Result<ShutdownReport, PoolError> {
        self.pool.shutdown(self.config.shutdown_timeout()).await
    }
}
