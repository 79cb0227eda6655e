//! Shopping cart module.
//!
//! Contains cart entries (finalized, priced selections) and the cart store
//! that owns them for one buyer session.

mod entry;
mod store;

pub(crate) use entry::current_timestamp;
pub use entry::{CartEntry, CourseKey};
pub use store::{CartStore, CourseGroup, MAX_QUANTITY_PER_ENTRY};
