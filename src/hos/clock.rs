//! A logical clock that advances only when told to — no wall-clock reads
//! inside the simulator itself.

use chrono::{Duration, NaiveDateTime};

/// Wraps the simulator's current timestamp and the minute-granularity
/// advance operation used by every event emission.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use eld_trip_planner::hos::clock::LogicalClock;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let mut clock = LogicalClock::new(start);
/// let end = clock.advance(30);
/// assert_eq!(end, start + chrono::Duration::minutes(30));
/// assert_eq!(clock.now(), end);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogicalClock {
    now: NaiveDateTime,
}

impl LogicalClock {
    /// Creates a clock starting at `start`.
    pub fn new(start: NaiveDateTime) -> Self {
        Self { now: start }
    }

    /// Current timestamp.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Advances the clock by `minutes` and returns the new timestamp.
    pub fn advance(&mut self, minutes: i64) -> NaiveDateTime {
        self.now += Duration::minutes(minutes);
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    #[test]
    fn advance_moves_clock_forward_by_minutes() {
        let mut clock = LogicalClock::new(start());
        clock.advance(90);
        assert_eq!(clock.now(), start() + Duration::minutes(90));
    }

    #[test]
    fn repeated_advances_accumulate() {
        let mut clock = LogicalClock::new(start());
        clock.advance(10);
        clock.advance(20);
        assert_eq!(clock.now(), start() + Duration::minutes(30));
    }
}
