//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryRecordStore**: 開発用の record store
//! - **ScriptedStore**: テスト用の故障注入デコレータ
//!
//! 本番用の store（RDB など）は別クレートに配置します。

pub mod inmem_store;

#[cfg(test)]
pub(crate) mod scripted_store;

pub use self::inmem_store::InMemoryRecordStore;
