//! Typed, per-session snapshots stored under a namespace.

use crate::{cache_key, Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A unique buyer session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Envelope written for every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// Monotonic write counter for this key.
    pub version: u64,
    /// When the snapshot was written (Unix timestamp).
    pub saved_at: u64,
    /// The stored value.
    pub data: T,
}

/// A namespace holding one snapshot of `T` per buyer session.
///
/// Every `save` writes the complete value in a single store operation.
///
/// # Example
///
/// ```rust,ignore
/// let carts = Namespace::<Vec<CartEntry>>::new(cache, "cart");
/// carts.save(&session_id, &entries)?;
/// let restored = carts.load(&session_id)?.unwrap_or_default();
/// ```
#[derive(Debug, Clone)]
pub struct Namespace<T> {
    cache: Cache,
    name: String,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Namespace<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind a namespace on an open cache.
    pub fn new(cache: Cache, name: impl Into<String>) -> Self {
        Self {
            cache,
            name: name.into(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// The namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load the snapshot for a session.
    ///
    /// Returns `CacheError::CorruptSnapshot` if the stored bytes cannot be
    /// decoded as `T`; the caller decides whether to reset.
    pub fn load(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.load_versioned(id)?.map(|s| s.data))
    }

    /// Load the snapshot including its envelope.
    pub fn load_versioned(&self, id: &SessionId) -> Result<Option<Snapshot<T>>, CacheError> {
        let key = self.key(id);
        match self.cache.get::<Snapshot<T>>(&key) {
            Ok(found) => Ok(found),
            Err(CacheError::SerializeError(e)) => Err(CacheError::CorruptSnapshot {
                key,
                reason: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Save the snapshot for a session, bumping its version.
    pub fn save(&self, id: &SessionId, data: &T) -> Result<u64, CacheError> {
        let key = self.key(id);
        // An unreadable previous snapshot restarts the version counter.
        let version = match self.cache.get::<Snapshot<serde_json::Value>>(&key) {
            Ok(Some(previous)) => previous.version + 1,
            _ => 1,
        };

        let snapshot = Snapshot {
            version,
            saved_at: now(),
            data,
        };
        self.cache.set(&key, &snapshot)?;
        tracing::trace!(namespace = %self.name, session = %id, version, "snapshot saved");
        Ok(version)
    }

    /// Remove the snapshot for a session.
    pub fn clear(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&self.key(id))
    }

    /// Check if a snapshot exists.
    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&self.key(id))
    }

    fn key(&self, id: &SessionId) -> String {
        cache_key!(self.name.as_str(), id)
    }
}

fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
