//! Selection module.
//!
//! The in-progress purchase configuration: package expansion into slots,
//! per-slot selection items, and the session state machine that ties them
//! together.

mod expander;
mod item;
mod session;

pub use expander::{expand, ExpandedSlot};
pub use item::{AlbumSummary, PhotoChoice, SelectionItem, VariationChoice};
pub use session::{FinalizedSelection, SelectionSession, SessionState};
