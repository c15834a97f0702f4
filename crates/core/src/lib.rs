//! agenda_core - Functional Core of the appointment week cache.
//!
//! Everything in this crate is pure: the calendar event model and its
//! conversion from backend records, ISO week keys and date arithmetic,
//! prefetch planning, and the traits and error types the cache is built on.
//! The stateful cache (timers, locks, in-flight tracking) lives in the
//! `agenda` crate.
//!
//! # Architecture
//!
//! - **Functional Core** (this crate): week math, merge-and-sort, planning
//! - **Imperative Shell** (`agenda`): LRU store, fetch coordination, timers

pub mod cache;
pub mod calendar;
pub mod week;
