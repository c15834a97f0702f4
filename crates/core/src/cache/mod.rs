//! Contracts between the week cache and the outside world.

mod error;
mod stats;
mod traits;

pub use error::{Result, SourceError, GENERIC_FETCH_ERROR};
pub use stats::CacheStats;
pub use traits::AppointmentSource;
