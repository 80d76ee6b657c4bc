//! Port abstraction for durable string-keyed slots.
//!
//! Each slot holds one JSON document. The session store keeps the active
//! identity under one key and the registered identity set under another;
//! adapters decide where the text actually lives.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value storage adapters.
    pub enum StorageError {
        /// The key cannot be mapped onto the backing medium.
        InvalidKey {
            /// Key as requested.
            key: String,
        } => "storage key {key} is not supported",
        /// Reading, writing, or removing a slot failed.
        Io {
            /// Slot being accessed.
            key: String,
            /// Adapter-level failure description.
            message: String,
        } => "storage access for {key} failed: {message}",
        /// A value could not be encoded before writing.
        Encoding {
            /// Serializer failure description.
            message: String,
        } => "could not encode stored value: {message}",
        /// A slot holds text that does not decode into its record type.
        Corrupt {
            /// Slot holding the undecodable value.
            key: String,
            /// Decoder failure description.
            message: String,
        } => "stored value under {key} could not be decoded: {message}",
        /// A previous writer panicked while holding the store.
        Poisoned => "storage lock poisoned",
    }
}

/// Durable string-keyed slot storage.
///
/// Implementations must treat removal of an absent key as success so callers
/// can clear slots unconditionally.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; absent keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
