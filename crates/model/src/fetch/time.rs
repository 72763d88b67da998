use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack added to an open upper bound so items stamped slightly ahead of the
/// local clock still fall inside the window.
pub const UPPER_BOUND_SKEW_MS: i64 = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeRangeError {
    #[error("'from' ({from}) is after 'to' ({to}): not valid")]
    InvertedBounds {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

/// Optional time window over item timestamps. Both bounds open means "no date
/// predicate at all", not "everything between epoch and now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Self, TimeRangeError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(TimeRangeError::InvertedBounds { from, to });
            }
        }
        Ok(Self { from, to })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    pub fn to(&self) -> Option<DateTime<Utc>> {
        self.to
    }

    pub fn has_bounds(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Concrete window for the query, or `None` when no bound is set. An open
    /// lower bound defaults to the epoch, an open upper bound to `now` plus a
    /// small skew allowance.
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if !self.has_bounds() {
            return None;
        }
        let from = self.from.unwrap_or(DateTime::UNIX_EPOCH);
        let to = self
            .to
            .unwrap_or(now + Duration::milliseconds(UPPER_BOUND_SKEW_MS));
        Some((from, to))
    }
}
