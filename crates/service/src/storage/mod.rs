//! Storage abstractions for service layer
//!
//! Wraps the embedded transactional key-value store that holds one serialized
//! merchant per key.

pub mod kv_store;

pub use kv_store::KvStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("kv: not found")]
    NotFound,
    #[error("kv: key already exists")]
    Exists,
    #[error("kv: storage unavailable: {0}")]
    Unavailable(String),
    #[error("kv: storage error: {0}")]
    Storage(String),
}

impl From<redb::DatabaseError> for KvError {
    fn from(e: redb::DatabaseError) -> Self { Self::Unavailable(e.to_string()) }
}

impl From<redb::TransactionError> for KvError {
    fn from(e: redb::TransactionError) -> Self { Self::Storage(e.to_string()) }
}

impl From<redb::TableError> for KvError {
    fn from(e: redb::TableError) -> Self { Self::Storage(e.to_string()) }
}

impl From<redb::StorageError> for KvError {
    fn from(e: redb::StorageError) -> Self { Self::Storage(e.to_string()) }
}

impl From<redb::CommitError> for KvError {
    fn from(e: redb::CommitError) -> Self { Self::Storage(e.to_string()) }
}
