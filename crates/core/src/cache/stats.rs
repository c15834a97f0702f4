use serde::Serialize;

use crate::week::WeekKey;

/// Diagnostic snapshot of the week cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_weeks: usize,
    pub oldest_week: Option<WeekKey>,
    pub newest_week: Option<WeekKey>,
    /// Confirmed events across all resident weeks.
    pub total_events: usize,
    pub optimistic_events: usize,
}

impl CacheStats {
    /// Builds stats from per-week `(key, confirmed, optimistic)` counts.
    pub fn from_weeks<I>(weeks: I) -> Self
    where
        I: IntoIterator<Item = (WeekKey, usize, usize)>,
    {
        weeks
            .into_iter()
            .fold(Self::default(), |mut stats, (key, confirmed, optimistic)| {
                stats.total_weeks += 1;
                stats.total_events += confirmed;
                stats.optimistic_events += optimistic;
                stats.oldest_week = Some(stats.oldest_week.map_or(key, |k| k.min(key)));
                stats.newest_week = Some(stats.newest_week.map_or(key, |k| k.max(key)));
                stats
            })
    }
}
