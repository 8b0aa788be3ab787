//! Pure conversion from a flat HOS timeline into per-day ELD log sheets.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::Serialize;

use crate::hos::{DutyStatus, TimelineEvent};

/// One 24-hour grid segment on a daily log sheet.
#[derive(Debug, Clone, Serialize)]
pub struct GridSegment {
    pub status: DutyStatus,
    pub start_hour: f64,
    pub end_hour: f64,
    pub duration_mins: i64,
}

/// Hours per duty status for a day's totals row. All four keys are always
/// present, zero if the status never occurred.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DutyTotals {
    #[serde(rename = "OFF")]
    pub off: f64,
    #[serde(rename = "SB")]
    pub sleeper_berth: f64,
    #[serde(rename = "D")]
    pub driving: f64,
    #[serde(rename = "ON")]
    pub on_duty: f64,
}

impl DutyTotals {
    fn zero() -> Self {
        Self {
            off: 0.0,
            sleeper_berth: 0.0,
            driving: 0.0,
            on_duty: 0.0,
        }
    }

    /// Sum of all four fields; should equal `24.0` within rounding slack for
    /// any log built from a full day.
    pub fn total_hours(&self) -> f64 {
        self.off + self.sleeper_berth + self.driving + self.on_duty
    }
}

/// A single remark line: a non-driving event worth calling out on the log
/// sheet (stop, break, rest, restart).
#[derive(Debug, Clone, Serialize)]
pub struct Remark {
    pub time: String,
    pub location: String,
    pub note: String,
}

/// One day's worth of ELD log sheet data.
#[derive(Debug, Clone, Serialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub segments: Vec<GridSegment>,
    pub totals: DutyTotals,
    pub remarks: Vec<Remark>,
}

/// Splits a flat timeline into per-day [`DailyLog`] sheets.
///
/// `driver_name` is accepted for forward compatibility (a future per-driver
/// remark prefix) but does not currently affect the output.
///
/// # Examples
///
/// ```
/// use eld_trip_planner::log_builder::build_daily_logs;
///
/// assert!(build_daily_logs(&[], "Driver").is_empty());
/// ```
pub fn build_daily_logs(timeline: &[TimelineEvent], driver_name: &str) -> Vec<DailyLog> {
    let _ = driver_name;

    if timeline.is_empty() {
        return Vec::new();
    }

    split_by_date(timeline)
        .into_iter()
        .map(|(date, events)| {
            let segments = to_grid_segments(&events, date);
            DailyLog {
                date,
                totals: sum_totals(&segments),
                remarks: remarks(&events),
                segments,
            }
        })
        .collect()
}

/// Splits events that span midnight into per-date slices. Ordering within a
/// date is preserved from the source timeline.
fn split_by_date(timeline: &[TimelineEvent]) -> BTreeMap<NaiveDate, Vec<TimelineEvent>> {
    let mut daily: BTreeMap<NaiveDate, Vec<TimelineEvent>> = BTreeMap::new();

    for ev in timeline {
        let mut cur = ev.start_time;
        let end = ev.end_time;

        while cur.date() < end.date() {
            let midnight = cur
                .date()
                .succ_opt()
                .expect("date arithmetic stays in range for any real trip")
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always a valid time");

            let mut slice = ev.clone();
            slice.start_time = cur;
            slice.end_time = midnight;
            slice.duration_mins = (midnight - cur).num_minutes();
            daily.entry(cur.date()).or_default().push(slice);

            cur = midnight;
        }

        if cur < end {
            let mut slice = ev.clone();
            slice.start_time = cur;
            slice.end_time = end;
            slice.duration_mins = (end - cur).num_minutes();
            daily.entry(cur.date()).or_default().push(slice);
        }
    }

    daily
}

/// Converts a date's event slices into `{status, start_hour, end_hour}` grid
/// segments in `[0, 24]`, then fills any gaps with `OFF`.
fn to_grid_segments(events: &[TimelineEvent], date: NaiveDate) -> Vec<GridSegment> {
    let mut raw = Vec::new();

    for ev in events {
        let sh = ev.start_time.hour() as f64 + ev.start_time.minute() as f64 / 60.0;
        let eh = if ev.end_time.date() > date {
            24.0
        } else {
            ev.end_time.hour() as f64 + ev.end_time.minute() as f64 / 60.0
        };

        let sh = sh.clamp(0.0, 24.0);
        let eh = eh.clamp(sh, 24.0);

        if eh > sh {
            raw.push(GridSegment {
                status: ev.status,
                start_hour: round2(sh),
                end_hour: round2(eh),
                duration_mins: ev.duration_mins,
            });
        }
    }

    fill_gaps(raw)
}

/// Fills any gap in the 24-hour grid with `OFF`. A date with no events
/// produces exactly one segment: `OFF [0, 24]`.
fn fill_gaps(segments: Vec<GridSegment>) -> Vec<GridSegment> {
    if segments.is_empty() {
        return vec![GridSegment {
            status: DutyStatus::Off,
            start_hour: 0.0,
            end_hour: 24.0,
            duration_mins: 1440,
        }];
    }

    let mut result = Vec::with_capacity(segments.len() + 2);

    if segments[0].start_hour > 0.0 {
        result.push(GridSegment {
            status: DutyStatus::Off,
            start_hour: 0.0,
            end_hour: segments[0].start_hour,
            duration_mins: (segments[0].start_hour * 60.0) as i64,
        });
    }

    for (i, seg) in segments.iter().enumerate() {
        result.push(seg.clone());

        if let Some(next) = segments.get(i + 1) {
            if seg.end_hour < next.start_hour {
                let gap = next.start_hour - seg.end_hour;
                result.push(GridSegment {
                    status: DutyStatus::Off,
                    start_hour: seg.end_hour,
                    end_hour: next.start_hour,
                    duration_mins: (gap * 60.0) as i64,
                });
            }
        }
    }

    if let Some(last) = result.last() {
        if last.end_hour < 24.0 {
            let start_hour = last.end_hour;
            result.push(GridSegment {
                status: DutyStatus::Off,
                start_hour,
                end_hour: 24.0,
                duration_mins: ((24.0 - start_hour) * 60.0) as i64,
            });
        }
    }

    result
}

fn sum_totals(segments: &[GridSegment]) -> DutyTotals {
    let mut totals = DutyTotals::zero();

    for seg in segments {
        let hrs = seg.end_hour - seg.start_hour;
        match seg.status {
            DutyStatus::Off => totals.off += hrs,
            DutyStatus::SleeperBerth => totals.sleeper_berth += hrs,
            DutyStatus::Driving => totals.driving += hrs,
            DutyStatus::OnDuty => totals.on_duty += hrs,
        }
    }

    totals.off = round2(totals.off);
    totals.sleeper_berth = round2(totals.sleeper_berth);
    totals.driving = round2(totals.driving);
    totals.on_duty = round2(totals.on_duty);
    totals
}

/// Non-driving events worth surfacing as remarks: any event with a non-empty
/// note that doesn't start with "Driving".
fn remarks(events: &[TimelineEvent]) -> Vec<Remark> {
    events
        .iter()
        .filter(|ev| !ev.note.is_empty() && !ev.note.starts_with("Driving"))
        .map(|ev| Remark {
            time: ev.start_time.format("%H:%M").to_string(),
            location: ev.location.clone(),
            note: ev.note.clone(),
        })
        .collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
