//! Week cache: LRU store plus the coordination around it.
//!
//! [`WeekCache`] is the single entry point. Its behaviour is split by
//! concern:
//! - `fetch`: de-duplicated week fetches and result handling
//! - `prefetch`: debounced, tiered warming of surrounding weeks
//! - `refresh`: periodic background refresh of the current week
//! - `optimistic`: locally created events with auto-expiry

mod fetch;
mod optimistic;
mod prefetch;
mod refresh;
mod store;
mod week_cache;

pub use store::{WeekEntry, WeekStore};
pub use week_cache::WeekCache;
