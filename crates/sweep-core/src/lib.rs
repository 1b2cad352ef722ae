//! sweep-core
//!
//! Concurrent batch processing of stored records on a fixed-size worker pool.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, record, outcome, state, errors）
//! - **ports**: 抽象化レイヤー（RecordStore）
//! - **pool**: WorkerPool（start / submit / shutdown、interrupt）
//! - **app**: アプリケーションロジック（builder, config, dispatcher, item_task, service）
//! - **impls**: 実装（InMemoryRecordStore）
//! - **observability**: BatchCounts と tracing の初期化

pub mod app;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod pool;
pub mod ports;
