//! Weekly adherence trends.
//!
//! Logs are bucketed by a simple week-of-year number (not ISO-8601):
//!
//! ```text
//! week = ceil((days_since_jan1 + weekday(jan1) + 1) / 7)    weekday: Sunday = 0
//! ```
//!
//! Week 1 may be partial, and late December can land in week 53. Which weeks
//! count as "most recent" is decided by a [`WeekOrdering`]; the lexical one
//! matches existing report output, including its misordering of single-digit
//! weeks (`"2024-W9"` sorts as newer than `"2024-W10"`).

use crate::adherence::percentage;
use crate::config::WeekOrderingKind;
use crate::{Log, LogStatus, TrendDirection, WeeklyTrend};
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Label used for dates that cannot be parsed
const UNPARSED_LABEL: &str = "NaN-WNaN";

/// Bucket identifier for one week
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeekKey {
    Week { year: i32, week: u32 },
    /// The log date was not a `YYYY-MM-DD` calendar day
    Unparsed,
}

impl WeekKey {
    /// Derive the week key for a `YYYY-MM-DD` date string
    ///
    /// Only the leading date part is read, so full timestamps also work.
    pub fn from_date_str(date: &str) -> Self {
        date.get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Self::from_date)
            .unwrap_or(WeekKey::Unparsed)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        let days_since_jan1 = date.ordinal0();
        // Jan 1 is ordinal 0, so its weekday offsets every later day
        let jan1_offset = date
            .with_ordinal0(0)
            .map(|jan1| jan1.weekday().num_days_from_sunday())
            .unwrap_or(0);

        let week = (days_since_jan1 + jan1_offset + 1).div_ceil(7);
        WeekKey::Week {
            year: date.year(),
            week,
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekKey::Week { year, week } => write!(f, "{}-W{}", year, week),
            WeekKey::Unparsed => f.write_str(UNPARSED_LABEL),
        }
    }
}

/// Recency comparator for week keys
///
/// `newest_first` must return `Ordering::Less` when `a` is more recent than `b`.
pub trait WeekOrdering {
    fn newest_first(&self, a: &WeekKey, b: &WeekKey) -> Ordering;
}

/// Descending string order of the rendered key
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicalOrdering;

impl WeekOrdering for LexicalOrdering {
    fn newest_first(&self, a: &WeekKey, b: &WeekKey) -> Ordering {
        b.to_string().cmp(&a.to_string())
    }
}

/// Descending by year, then week number. Unparsed keys are oldest.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChronologicalOrdering;

impl WeekOrdering for ChronologicalOrdering {
    fn newest_first(&self, a: &WeekKey, b: &WeekKey) -> Ordering {
        let rank = |k: &WeekKey| match *k {
            WeekKey::Week { year, week } => Some((year, week)),
            WeekKey::Unparsed => None,
        };
        rank(b).cmp(&rank(a))
    }
}

impl WeekOrderingKind {
    pub fn comparator(self) -> Box<dyn WeekOrdering> {
        match self {
            WeekOrderingKind::Lexical => Box::new(LexicalOrdering),
            WeekOrderingKind::Chronological => Box::new(ChronologicalOrdering),
        }
    }
}

#[derive(Default)]
struct Bucket {
    taken: u32,
    total: u32,
}

/// Adherence for the `weeks` most recent weeks with logs, oldest first
///
/// Every log counts toward a week's total, whatever its status.
pub fn weekly_trends(logs: &[Log], ordering: &dyn WeekOrdering, weeks: usize) -> Vec<WeeklyTrend> {
    let mut buckets: HashMap<WeekKey, Bucket> = HashMap::new();
    for log in logs {
        let bucket = buckets.entry(WeekKey::from_date_str(&log.date)).or_default();
        if log.status == LogStatus::Taken {
            bucket.taken += 1;
        }
        bucket.total += 1;
    }

    if buckets.contains_key(&WeekKey::Unparsed) {
        tracing::warn!("Some logs have unparseable dates; grouped under {}", UNPARSED_LABEL);
    }

    let mut keys: Vec<WeekKey> = buckets.keys().copied().collect();
    keys.sort_by(|a, b| ordering.newest_first(a, b));
    keys.truncate(weeks);
    keys.reverse();

    keys.into_iter()
        .map(|key| {
            let bucket = &buckets[&key];
            WeeklyTrend {
                week: key.to_string(),
                adherence_rate: percentage(bucket.taken, bucket.total),
            }
        })
        .collect()
}

/// Direction of each week against the previous one
///
/// The first entry has no predecessor. Equal rates count as declining.
pub fn trend_directions(trends: &[WeeklyTrend]) -> Vec<Option<TrendDirection>> {
    let mut directions = Vec::with_capacity(trends.len());
    if !trends.is_empty() {
        directions.push(None);
    }
    directions.extend(trends.windows(2).map(|pair| {
        if pair[1].adherence_rate > pair[0].adherence_rate {
            Some(TrendDirection::Improving)
        } else {
            Some(TrendDirection::Declining)
        }
    }));
    directions
}
