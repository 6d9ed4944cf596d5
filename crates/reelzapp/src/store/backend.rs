use crate::error::Result;

/// Abstract interface for raw key/value text storage.
///
/// This trait handles the "how" of storage (directory of files vs memory),
/// while [`LocalStore`](super::local_store::LocalStore) handles the "what"
/// (typed collections, lenient parsing, revision stamps).
///
/// The shape mirrors browser local storage: a flat namespace of string keys
/// holding text values. All methods take `&self`; implementations use interior
/// mutability since everything runs on one thread.
pub trait StorageBackend {
    /// Read the raw value stored under `key`.
    /// Returns Ok(None) if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    /// MUST be atomic: readers see either the old or the new value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// List all keys currently stored.
    fn keys(&self) -> Result<Vec<String>>;
}
