//! Key-Value store wrapper with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(not(target_arch = "wasm32"))]
use std::sync::{Arc, Mutex, OnceLock};

#[cfg(not(target_arch = "wasm32"))]
type MemoryStore = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// Name of the store opened by [`Cache::open_default`].
pub const DEFAULT_STORE: &str = "default";

/// Type-safe cache backed by Spin's Key-Value Store.
///
/// On native targets the same API is served by an in-process store; opening a
/// name twice returns a handle to the same data, so a reload sees what the
/// previous handle wrote.
#[derive(Clone)]
pub struct Cache {
    #[cfg(target_arch = "wasm32")]
    store: std::rc::Rc<spin_sdk::key_value::Store>,
    #[cfg(not(target_arch = "wasm32"))]
    store: MemoryStore,
    #[cfg(not(target_arch = "wasm32"))]
    read_only: Arc<AtomicBool>,
}

#[cfg(not(target_arch = "wasm32"))]
fn registry() -> &'static Mutex<HashMap<String, MemoryStore>> {
    static STORES: OnceLock<Mutex<HashMap<String, MemoryStore>>> = OnceLock::new();
    STORES.get_or_init(|| Mutex::new(HashMap::new()))
}

impl Cache {
    /// Open the default Key-Value store.
    pub fn open_default() -> Result<Self, CacheError> {
        Self::open(DEFAULT_STORE)
    }

    /// Open a named Key-Value store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open("snapcart")?;
    /// ```
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            store: std::rc::Rc::new(store),
        })
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    #[cfg(target_arch = "wasm32")]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key) {
            Ok(Some(bytes)) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::StoreError(e.to_string())),
        }
    }

    /// Set a value in the cache.
    ///
    /// The value is fully serialized before the store is touched, so a failed
    /// serialization never leaves a partial write behind.
    #[cfg(target_arch = "wasm32")]
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store
            .set(key, &bytes)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    /// Delete a value from the cache.
    #[cfg(target_arch = "wasm32")]
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store
            .delete(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    /// Check if a key exists in the cache.
    #[cfg(target_arch = "wasm32")]
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store
            .exists(key)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    /// Get all keys in the cache.
    #[cfg(target_arch = "wasm32")]
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store
            .get_keys()
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    /// Write raw bytes under a key.
    #[cfg(target_arch = "wasm32")]
    pub fn set_raw(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        self.store
            .set(key, bytes)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    // In-process backend for native builds and tests

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let mut stores = registry()
            .lock()
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        let store = stores.entry(name.to_string()).or_default().clone();
        Ok(Self {
            store,
            read_only: Arc::default(),
        })
    }

    /// Create a private in-memory cache not shared through the store registry.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_memory() -> Self {
        Self {
            store: MemoryStore::default(),
            read_only: Arc::default(),
        }
    }

    /// Reject every write through this handle and its clones, as a store
    /// outage would.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn check_writable(&self) -> Result<(), CacheError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CacheError::StoreError("store is read-only".to_string()));
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn with_store<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Vec<u8>>) -> R,
    ) -> Result<R, CacheError> {
        let mut guard = self
            .store
            .lock()
            .map_err(|e| CacheError::StoreError(e.to_string()))?;
        Ok(f(&mut guard))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.with_store(|s| s.get(key).cloned())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.check_writable()?;
        let bytes = serde_json::to_vec(value)?;
        self.with_store(|s| {
            s.insert(key.to_string(), bytes);
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.check_writable()?;
        self.with_store(|s| {
            s.remove(key);
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.with_store(|s| s.contains_key(key))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.with_store(|s| {
            let mut keys: Vec<String> = s.keys().cloned().collect();
            keys.sort();
            keys
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn set_raw(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        self.check_writable()?;
        self.with_store(|s| {
            s.insert(key.to_string(), bytes.to_vec());
        })
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("cart", session_id);
/// // Returns "cart:sess_abc"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
