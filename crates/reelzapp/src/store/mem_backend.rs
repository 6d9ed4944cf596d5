use super::backend::StorageBackend;
use crate::error::{ReelzError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct MemState {
    items: HashMap<String, String>,
    fail_writes_to: Option<String>,
    quota_bytes: Option<usize>,
}

/// In-memory storage backend for testing.
///
/// Uses `Rc<RefCell<..>>` since reelz is single-threaded. Clones share the
/// same storage, which is how tests model two tabs open on one browser profile.
#[derive(Clone, Default)]
pub struct MemBackend {
    state: Rc<RefCell<MemState>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of stored values, like a browser storage quota.
    pub fn with_quota(self, bytes: usize) -> Self {
        self.state.borrow_mut().quota_bytes = Some(bytes);
        self
    }

    /// Make writes to one specific key fail, leaving all other keys writable.
    pub fn fail_writes_to(&self, key: Option<&str>) {
        self.state.borrow_mut().fail_writes_to = key.map(str::to_string);
    }

    /// Test helper to plant raw (possibly malformed) text under a key.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.state
            .borrow()
            .items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl StorageBackend for MemBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let (failing, quota) = {
            let state = self.state.borrow();
            let failing = state.fail_writes_to.as_deref() == Some(key);
            (failing, state.quota_bytes)
        };
        if failing {
            return Err(ReelzError::Store("Simulated write error".to_string()));
        }
        if let Some(quota) = quota {
            if self.used_bytes_without(key) + key.len() + value.len() > quota {
                return Err(ReelzError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.state
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.state.borrow_mut().items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.state.borrow().items.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
