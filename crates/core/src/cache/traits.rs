use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::calendar::RawAppointment;

use super::Result;

/// Backend that can be queried for appointments by date range.
///
/// Both bounds are inclusive local datetimes. Implementations may be slow
/// or fail; the cache never assumes otherwise.
#[async_trait]
pub trait AppointmentSource: Send + Sync {
    /// Fetches every appointment starting within `[start, end]`.
    async fn fetch_appointments_by_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawAppointment>>;
}
