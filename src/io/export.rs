//! CSV export for timelines and daily logs, for offline inspection
//! (`--csv-out`). Not part of the HTTP contract.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::hos::TimelineEvent;
use crate::log_builder::DailyLog;

/// Column header for timeline CSV export.
const TIMELINE_HEADER: &str = "day,status,start_time,end_time,duration_mins,location,lat,lng,note";

/// Column header for daily-log CSV export. One row per grid segment.
const DAILY_LOG_HEADER: &str = "date,status,start_hour,end_hour,duration_mins";

/// Exports a timeline to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_timeline_csv(timeline: &[TimelineEvent], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_timeline_csv(timeline, io::BufWriter::new(file))
}

/// Writes a timeline as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_timeline_csv(timeline: &[TimelineEvent], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(TIMELINE_HEADER.split(','))?;

    for ev in timeline {
        wtr.write_record(&[
            ev.day.to_string(),
            ev.status.to_string(),
            ev.start_time.to_string(),
            ev.end_time.to_string(),
            ev.duration_mins.to_string(),
            ev.location.clone(),
            format!("{:.6}", ev.lat),
            format!("{:.6}", ev.lng),
            ev.note.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports daily logs to a CSV file at the given path, one row per grid
/// segment.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_daily_logs_csv(logs: &[DailyLog], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_daily_logs_csv(logs, io::BufWriter::new(file))
}

/// Writes daily logs as CSV to any writer, one row per grid segment.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_daily_logs_csv(logs: &[DailyLog], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(DAILY_LOG_HEADER.split(','))?;

    for log in logs {
        for seg in &log.segments {
            wtr.write_record(&[
                log.date.to_string(),
                seg.status.to_string(),
                format!("{:.2}", seg.start_hour),
                format!("{:.2}", seg.end_hour),
                seg.duration_mins.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hos::{DutyStatus, StopKind};
    use chrono::{Duration, NaiveDate};

    fn event(status: DutyStatus, hour: u32, mins: i64, note: &str) -> TimelineEvent {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TimelineEvent {
            status,
            start_time: start,
            end_time: start + Duration::minutes(mins),
            duration_mins: mins,
            location: "Chicago".to_string(),
            lat: 41.8781,
            lng: -87.6298,
            note: note.to_string(),
            day: 1,
            kind: Some(StopKind::Pickup),
        }
    }

    #[test]
    fn timeline_header_is_stable() {
        let timeline = vec![event(DutyStatus::Driving, 6, 120, "Driving: A \u{2192} B")];
        let mut buf = Vec::new();
        write_timeline_csv(&timeline, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let first_line = output.lines().next().unwrap();
        assert_eq!(
            first_line,
            "day,status,start_time,end_time,duration_mins,location,lat,lng,note"
        );
    }

    #[test]
    fn timeline_row_count_matches_event_count() {
        let timeline = vec![
            event(DutyStatus::Driving, 6, 120, "Driving: A \u{2192} B"),
            event(DutyStatus::OnDuty, 8, 60, "Loading at pickup"),
        ];
        let mut buf = Vec::new();
        write_timeline_csv(&timeline, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn timeline_round_trips_through_csv_reader() {
        let timeline = vec![event(DutyStatus::Driving, 6, 120, "Driving: A \u{2192} B")];
        let mut buf = Vec::new();
        write_timeline_csv(&timeline, &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.len(), 9);

        let mut rows = 0;
        for record in rdr.records() {
            let rec = record.unwrap();
            assert_eq!(rec.len(), 9);
            rows += 1;
        }
        assert_eq!(rows, 1);
    }

    #[test]
    fn daily_log_csv_has_one_row_per_segment() {
        use crate::log_builder::{DutyTotals, GridSegment, Remark};

        let log = DailyLog {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            segments: vec![
                GridSegment {
                    status: DutyStatus::Off,
                    start_hour: 0.0,
                    end_hour: 6.0,
                    duration_mins: 360,
                },
                GridSegment {
                    status: DutyStatus::Driving,
                    start_hour: 6.0,
                    end_hour: 8.0,
                    duration_mins: 120,
                },
            ],
            totals: DutyTotals {
                off: 22.0,
                sleeper_berth: 0.0,
                driving: 2.0,
                on_duty: 0.0,
            },
            remarks: Vec::<Remark>::new(),
        };

        let mut buf = Vec::new();
        write_daily_logs_csv(&[log], &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        // 1 header + 2 segment rows
        assert_eq!(output.lines().count(), 3);
    }
}
