//! The 14-hour duty window as a tagged variant rather than a nullable
//! timestamp.

use chrono::NaiveDateTime;

use crate::rules::MAX_WINDOW;

/// Whether the simulator's 14-hour duty window is currently open, and since
/// when.
///
/// The window opens on the first on-duty event of a shift and closes only on
/// a 10-hour rest or a 34-hour restart. Modeling it as two variants instead
/// of an `Option<NaiveDateTime>` with implicit "unset" semantics keeps the
/// open/closed transition explicit at every call site.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use eld_trip_planner::hos::window::DutyWindow;
///
/// let t0 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let mut window = DutyWindow::Closed;
/// assert_eq!(window.minutes_left(t0), 840);
///
/// window.open_if_closed(t0);
/// let later = t0 + chrono::Duration::hours(2);
/// assert_eq!(window.minutes_left(later), 720);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DutyWindow {
    /// The window has not yet opened this shift.
    Closed,
    /// The window opened at the given timestamp.
    Open(NaiveDateTime),
}

impl DutyWindow {
    /// Opens the window at `now` if it is currently closed; a no-op if
    /// already open.
    pub fn open_if_closed(&mut self, now: NaiveDateTime) {
        if matches!(self, Self::Closed) {
            *self = Self::Open(now);
        }
    }

    /// Minutes remaining in the 14-hour window as of `now`, clamped to `>= 0`.
    /// Returns the full [`MAX_WINDOW`] while the window is closed.
    pub fn minutes_left(&self, now: NaiveDateTime) -> i64 {
        match self {
            Self::Closed => MAX_WINDOW,
            Self::Open(start) => {
                let elapsed = (now - *start).num_minutes();
                (MAX_WINDOW - elapsed).max(0)
            }
        }
    }

    /// Closes the window, discarding its start time.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }
}
