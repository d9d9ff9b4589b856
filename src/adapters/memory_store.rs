//! Request-scoped cookie jar.
//!
//! A [`MemoryCookieStore`] is built from the incoming request's `Cookie`
//! header at the start of a cycle. Writes and deletes are remembered so the
//! response can carry the matching `Set-Cookie` headers at the end of it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::traits::{CookieOptions, CredentialStore, StoreError};

/// A pending change to send back to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CookieChange {
    Set { value: String, options: CookieOptions },
    Removed { options: CookieOptions },
}

#[derive(Debug, Default)]
struct Jar {
    values: HashMap<String, String>,
    /// Changes keyed by name, in first-touched order.
    changes: Vec<(String, CookieChange)>,
}

impl Jar {
    fn record(&mut self, name: &str, change: CookieChange) {
        if let Some(entry) = self.changes.iter_mut().find(|(n, _)| n == name) {
            entry.1 = change;
        } else {
            self.changes.push((name.to_string(), change));
        }
    }
}

/// In-memory cookie jar for one request/response cycle.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    jar: Mutex<Jar>,
}

impl MemoryCookieStore {
    /// Create an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a jar from a `Cookie` request header value.
    ///
    /// Malformed pairs are skipped. The parsed values are not pending changes.
    pub fn from_cookie_header(header: &str) -> Self {
        let values = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();

        Self {
            jar: Mutex::new(Jar {
                values,
                changes: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Jar>, StoreError> {
        self.jar
            .lock()
            .map_err(|_| StoreError::Other("cookie jar lock poisoned".to_string()))
    }

    /// `Set-Cookie` header values for every change made during the cycle.
    ///
    /// Removed cookies are expired with `Max-Age=0` under the attributes
    /// given to `delete`.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        let Ok(jar) = self.lock() else {
            return Vec::new();
        };
        jar.changes
            .iter()
            .map(|(name, change)| match change {
                CookieChange::Set { value, options } => options.to_set_cookie(name, value),
                CookieChange::Removed { options } => {
                    options.clone().with_max_age(0).to_set_cookie(name, "")
                }
            })
            .collect()
    }

    /// Whether anything was written or removed during the cycle.
    pub fn has_changes(&self) -> bool {
        self.lock().map(|jar| !jar.changes.is_empty()).unwrap_or(false)
    }
}

#[async_trait]
impl CredentialStore for MemoryCookieStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.values.get(name).cloned())
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), StoreError> {
        let mut jar = self.lock()?;
        jar.values.insert(name.to_string(), value.to_string());
        jar.record(
            name,
            CookieChange::Set {
                value: value.to_string(),
                options: options.clone(),
            },
        );
        Ok(())
    }

    async fn delete(&self, name: &str, options: &CookieOptions) -> Result<(), StoreError> {
        let mut jar = self.lock()?;
        jar.values.remove(name);
        jar.record(
            name,
            CookieChange::Removed {
                options: options.clone(),
            },
        );
        Ok(())
    }
}
