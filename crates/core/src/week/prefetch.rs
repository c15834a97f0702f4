//! Progressive prefetch planning.
//!
//! Pure planning step of the prefetch scheduler: given the current week and
//! a predicate telling which weeks need data, produce the ordered list of
//! weeks to warm. Draining the list is left to the caller.

use super::{WeekKey, WeekRange};

/// A ring of weeks around the current one, warmed with a given priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchTier {
    /// Lower values are fetched first.
    pub priority: u8,
    /// Maximum distance from the current week, in weeks.
    pub reach: i64,
}

/// Prefetch tiers, nearest first.
pub const PREFETCH_TIERS: [PrefetchTier; 4] = [
    PrefetchTier {
        priority: 1,
        reach: 1,
    },
    PrefetchTier {
        priority: 2,
        reach: 4,
    },
    PrefetchTier {
        priority: 3,
        reach: 8,
    },
    PrefetchTier {
        priority: 4,
        reach: 12,
    },
];

/// A week scheduled for background fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchRequest {
    pub key: WeekKey,
    pub priority: u8,
    pub range: WeekRange,
}

impl PrefetchRequest {
    fn new(key: WeekKey, priority: u8) -> Self {
        Self {
            key,
            priority,
            range: WeekRange::for_key(&key),
        }
    }
}

/// Plans background fetches for the weeks surrounding `current`.
///
/// Each week within 12 weeks of `current` (excluding `current` itself) is
/// considered exactly once, at the lowest-priority-number tier that reaches
/// it, nearest offsets first and the past before the future at equal
/// distance. Only weeks for which `needs_fetch` returns true are kept. The
/// result is stable-sorted ascending by priority.
///
/// # Examples
///
/// ```
/// use agenda_core::week::{plan_prefetch, WeekKey};
/// use chrono::NaiveDate;
///
/// let current = WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
/// let plan = plan_prefetch(&current, |_| true);
///
/// assert_eq!(plan.len(), 24);
/// assert_eq!(plan[0].key, current.shift(-1));
/// assert_eq!(plan[1].key, current.shift(1));
/// assert_eq!(plan[0].priority, 1);
/// ```
pub fn plan_prefetch<F>(current: &WeekKey, mut needs_fetch: F) -> Vec<PrefetchRequest>
where
    F: FnMut(&WeekKey) -> bool,
{
    let mut plan = Vec::new();
    let mut covered = 0;

    for tier in PREFETCH_TIERS {
        for distance in (covered + 1)..=tier.reach {
            for offset in [-distance, distance] {
                let key = current.shift(offset);
                if needs_fetch(&key) {
                    plan.push(PrefetchRequest::new(key, tier.priority));
                }
            }
        }
        covered = tier.reach;
    }

    plan.sort_by_key(|request| request.priority);
    plan
}
