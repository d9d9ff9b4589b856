//! Recording credential store for testing.
//!
//! Keeps entries in memory, logs every operation, and can be told to fail
//! individual operations so error paths can be exercised.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::traits::{CookieOptions, CredentialStore, StoreError};

/// An operation performed against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Get { name: String },
    Set { name: String, value: String, options: CookieOptions },
    Delete { name: String },
}

/// Recording credential store for testing.
///
/// # Example
///
/// ```ignore
/// use authstate::adapters::mock::MockCookieStore;
///
/// let store = MockCookieStore::with_entries(&[
///     ("access_token", "valid-access-token"),
///     ("refresh_token", "valid-refresh-token"),
/// ]);
/// // ... run a cycle against it ...
/// assert!(store.writes().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCookieStore {
    /// Stored entries
    entries: Arc<Mutex<HashMap<String, String>>>,
    /// Every operation, in order
    ops: Arc<Mutex<Vec<StoreOp>>>,
    /// Whether get should fail
    get_should_fail: Arc<Mutex<bool>>,
    /// Entry names whose set should fail
    failing_sets: Arc<Mutex<HashSet<String>>>,
    /// Whether delete should fail
    delete_should_fail: Arc<Mutex<bool>>,
}

impl MockCookieStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial entries. Seeding is not recorded.
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.lock().unwrap();
            for (name, value) in entries {
                map.insert(name.to_string(), value.to_string());
            }
        }
        store
    }

    /// Configure whether get should fail.
    pub fn set_get_should_fail(&self, should_fail: bool) {
        *self.get_should_fail.lock().unwrap() = should_fail;
    }

    /// Make set fail for the named entry.
    pub fn fail_set_for(&self, name: &str) {
        self.failing_sets.lock().unwrap().insert(name.to_string());
    }

    /// Configure whether delete should fail.
    pub fn set_delete_should_fail(&self, should_fail: bool) {
        *self.delete_should_fail.lock().unwrap() = should_fail;
    }

    /// Current value of an entry, without recording a read.
    pub fn value(&self, name: &str) -> Option<String> {
        self.entries.lock().unwrap().get(name).cloned()
    }

    /// Replace an entry directly, without recording a write.
    pub fn put(&self, name: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    /// All recorded operations.
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Recorded set operations.
    pub fn writes(&self) -> Vec<StoreOp> {
        self.ops()
            .into_iter()
            .filter(|op| matches!(op, StoreOp::Set { .. }))
            .collect()
    }

    /// Names passed to delete, in order.
    pub fn deleted_names(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                StoreOp::Delete { name } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Whether any write or delete was recorded.
    pub fn is_untouched(&self) -> bool {
        self.ops()
            .iter()
            .all(|op| matches!(op, StoreOp::Get { .. }))
    }

    fn record(&self, op: StoreOp) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl CredentialStore for MockCookieStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        self.record(StoreOp::Get {
            name: name.to_string(),
        });
        if *self.get_should_fail.lock().unwrap() {
            return Err(StoreError::ReadFailed("Mock get failure".to_string()));
        }
        Ok(self.value(name))
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), StoreError> {
        self.record(StoreOp::Set {
            name: name.to_string(),
            value: value.to_string(),
            options: options.clone(),
        });
        if self.failing_sets.lock().unwrap().contains(name) {
            return Err(StoreError::WriteFailed(format!("Mock set failure for {}", name)));
        }
        self.put(name, value);
        Ok(())
    }

    async fn delete(&self, name: &str, _options: &CookieOptions) -> Result<(), StoreError> {
        self.record(StoreOp::Delete {
            name: name.to_string(),
        });
        if *self.delete_should_fail.lock().unwrap() {
            return Err(StoreError::DeleteFailed("Mock delete failure".to_string()));
        }
        self.entries.lock().unwrap().remove(name);
        Ok(())
    }
}
