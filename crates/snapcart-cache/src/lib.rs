//! Namespaced Key-Value persistence for SnapCart buyer sessions.
//!
//! Stores typed JSON snapshots in Spin's Key-Value Store (or an in-process
//! store on native targets) under `namespace:session` keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use snapcart_cache::{Cache, Namespace, SessionId};
//!
//! let cache = Cache::open("snapcart")?;
//! let carts = Namespace::<Vec<CartEntry>>::new(cache, "cart");
//!
//! let session = SessionId::generate();
//! carts.save(&session, &entries)?;
//!
//! let restored = carts.load(&session)?.unwrap_or_default();
//! ```

mod error;
mod kv;
mod namespace;

pub use error::CacheError;
pub use kv::{Cache, DEFAULT_STORE};
pub use namespace::{Namespace, SessionId, Snapshot};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Namespace, SessionId};
}
