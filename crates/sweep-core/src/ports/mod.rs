//! Ports - 抽象化レイヤー
//!
//! External collaborators the core calls into. Only the record store is a
//! port: routing and transport live outside this crate.

pub mod record_store;

pub use self::record_store::RecordStore;
