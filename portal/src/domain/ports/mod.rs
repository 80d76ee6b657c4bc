//! Domain ports for the storage boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod key_value_store;

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, StorageError};
