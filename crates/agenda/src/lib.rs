//! agenda - Imperative Shell of the appointment week cache.
//!
//! Holds the stateful parts built on `agenda_core`: the LRU week store,
//! fetch de-duplication, progressive prefetching, the background refresh
//! timer and the optimistic event overlay, all behind [`WeekCache`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use agenda::{CacheConfig, InMemorySource, WeekCache};
//! use chrono::NaiveDate;
//!
//! let cache = WeekCache::new(Arc::new(InMemorySource::new()), CacheConfig::default());
//! cache.select_week(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()).await;
//! for event in cache.appointments().iter() {
//!     println!("{} {}", event.start_time, event.contact_name);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod source;

pub use cache::{WeekCache, WeekEntry, WeekStore};
pub use config::CacheConfig;
pub use source::InMemorySource;
