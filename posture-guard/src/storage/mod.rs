mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::StorageError;
use serde_json::Value;

/// Trait for key/value persistence backends holding JSON documents
pub trait ProfileStorage {
    /// Read the document stored under `key`, if any
    ///
    /// Backends report unreadable data as absent.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store a document under `key`, replacing any previous one
    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Delete the document under `key`; missing keys are ignored
    fn remove(&mut self, key: &str);
}

impl<S: ProfileStorage + ?Sized> ProfileStorage for Box<S> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}
