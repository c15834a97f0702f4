//! Week identification and date arithmetic.
//!
//! A week is the unit of caching granularity. Weeks start on Monday and
//! are named by their ISO 8601 week (`YYYY-Www`).

mod error;
mod key;
mod prefetch;
mod range;

pub use error::WeekKeyError;
pub use key::{iso_week_number, week_start, WeekKey};
pub use prefetch::{plan_prefetch, PrefetchRequest, PrefetchTier, PREFETCH_TIERS};
pub use range::WeekRange;
