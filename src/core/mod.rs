//! Core business logic, independent of any user interface.
//!
//! The pure engine (`record`, `derived`, `filter`, `sort`, `totals`, `table`) works on
//! in-memory records only. `normalizer` builds those records from stored rows, and `item`
//! and `item_type` perform the transactional writes.

pub mod derived;
pub mod filter;
pub mod item;
pub mod item_type;
pub mod normalizer;
pub mod record;
pub mod session;
pub mod sort;
pub mod table;
pub mod totals;

pub use record::{Condition, Record, Role};
pub use session::Session;
