//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **AppBuilder / App**: 構築と worker pool のライフサイクル
//! - **BatchProcessor**: record id ごとに ItemTask を投入し、結果を集約
//! - **ItemTask**: 1 件分の処理（fetch → PROCESSED → persist）
//! - **RecordService**: CRUD + process_all
//! - **ProcessorConfig**: 設定

pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod item_task;
pub mod service;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::config::{ConfigError, ProcessorConfig};
pub use self::dispatcher::{BatchHandle, BatchProcessor};
pub use self::item_task::ItemTask;
pub use self::service::RecordService;
