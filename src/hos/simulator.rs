//! The HOS trip simulator: a deterministic state machine that turns a
//! sequence of planned activities into a legal duty-status timeline.

use chrono::NaiveDateTime;

use crate::rules::{
    AVG_SPEED_MPH, BREAK, FUEL_DURATION, FUEL_INTERVAL_MI, MAX_CYCLE, MAX_CYCLE_HOURS_INPUT,
    MAX_DRIVE_BEFORE_BREAK, MAX_DRIVING, PICKUP_DROPOFF_DURATION, REST, RESTART,
};

use super::clock::LogicalClock;
use super::error::SimulatorError;
use super::types::{DutyStatus, StopKind, TimelineEvent};
use super::window::DutyWindow;

/// Defensive cap on inner-loop iterations per [`Simulator::drive_segment`]
/// call. Every branch either drives a positive number of minutes or resets
/// a counter that makes more driving available, so this can only be reached
/// by a logic bug — not by any legal input.
const MAX_DRIVE_LOOP_ITERATIONS: usize = 100_000;

/// Stateful FMCSA Hours-of-Service simulator.
///
/// One instance models one trip end-to-end: construct with [`Simulator::new`],
/// drive it through the fixed activity sequence (`drive_segment`,
/// `add_pickup`, `drive_segment`, `add_dropoff`), then read [`Simulator::timeline`]
/// and [`Simulator::total_miles`]. Never reused across trips.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use eld_trip_planner::hos::Simulator;
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let mut sim = Simulator::new(0.0, start).unwrap();
/// sim.drive_segment(300.0, "Chicago", "Indianapolis", 0.0, 0.0, 0.0, 0.0).unwrap();
/// assert!((sim.total_miles() - 300.0).abs() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    clock: LogicalClock,
    shift_driving: i64,
    window: DutyWindow,
    since_break: i64,
    cycle_used: i64,
    miles_since_fuel: f64,
    total_miles: f64,
    timeline: Vec<TimelineEvent>,
    day: u32,
}

impl Simulator {
    /// Creates a new simulator starting at `start_time` with `cycle_used_hours`
    /// already spent on the 70-hour cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidInput`] if `cycle_used_hours` is not
    /// in `[0, 70)`.
    pub fn new(cycle_used_hours: f64, start_time: NaiveDateTime) -> Result<Self, SimulatorError> {
        if !(0.0..MAX_CYCLE_HOURS_INPUT).contains(&cycle_used_hours) {
            return Err(SimulatorError::InvalidInput(format!(
                "cycle_used_hours must be in [0, {MAX_CYCLE_HOURS_INPUT}), got {cycle_used_hours}"
            )));
        }

        Ok(Self {
            clock: LogicalClock::new(start_time),
            shift_driving: 0,
            window: DutyWindow::Closed,
            since_break: 0,
            cycle_used: (cycle_used_hours * 60.0).round() as i64,
            miles_since_fuel: 0.0,
            total_miles: 0.0,
            timeline: Vec::new(),
            day: 1,
        })
    }

    /// Read-only snapshot of the timeline built so far.
    pub fn timeline(&self) -> &[TimelineEvent] {
        &self.timeline
    }

    /// Total miles driven so far, rounded to one decimal.
    pub fn total_miles(&self) -> f64 {
        (self.total_miles * 10.0).round() / 10.0
    }

    /// Minutes counted against the 70-hour cycle so far.
    pub fn cycle_used_minutes(&self) -> i64 {
        self.cycle_used
    }

    /// Plans driving of approximately `miles` between two labeled points,
    /// inserting every mandatory break, rest, restart, and fuel stop the
    /// distance requires.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidInput`] if `miles` is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn drive_segment(
        &mut self,
        miles: f64,
        from_label: &str,
        to_label: &str,
        lat_from: f64,
        lng_from: f64,
        _lat_to: f64,
        _lng_to: f64,
    ) -> Result<(), SimulatorError> {
        if miles < 0.0 {
            return Err(SimulatorError::InvalidInput(format!(
                "miles must be >= 0, got {miles}"
            )));
        }

        let mut remaining = miles;
        while remaining > 0.5 {
            let to_fuel = FUEL_INTERVAL_MI - self.miles_since_fuel;
            let chunk_mi = remaining.min(to_fuel.max(0.5));
            let chunk_min = ((chunk_mi / AVG_SPEED_MPH) * 60.0).round().max(1.0) as i64;

            let driven = self.drive(chunk_min, from_label, to_label, lat_from, lng_from)?;

            let actual_mi = (driven as f64 / 60.0) * AVG_SPEED_MPH;
            remaining -= actual_mi;
            self.miles_since_fuel += actual_mi;
            self.total_miles += actual_mi;

            if self.miles_since_fuel >= FUEL_INTERVAL_MI && remaining > 0.5 {
                self.emit_fuel_stop(from_label, lat_from, lng_from);
            }
        }

        Ok(())
    }

    /// Emits a 60-minute on-duty pickup stop.
    pub fn add_pickup(&mut self, location: &str, lat: f64, lng: f64) {
        self.on_duty_stop(location, lat, lng, "Loading at pickup", StopKind::Pickup);
    }

    /// Emits a 60-minute on-duty dropoff stop.
    pub fn add_dropoff(&mut self, location: &str, lat: f64, lng: f64) {
        self.on_duty_stop(
            location,
            lat,
            lng,
            "Unloading at dropoff",
            StopKind::Dropoff,
        );
    }

    /// Drives `minutes` of requested driving time, looping through any
    /// mandatory break/rest/restart insertions until the full request has
    /// been driven. Returns the total minutes actually driven, which always
    /// equals `minutes` for a well-formed run.
    fn drive(
        &mut self,
        minutes: i64,
        from: &str,
        to: &str,
        lat: f64,
        lng: f64,
    ) -> Result<i64, SimulatorError> {
        let mut remaining = minutes;
        let mut driven_total = 0;
        let mut iterations = 0;

        while remaining > 0 {
            iterations += 1;
            if iterations > MAX_DRIVE_LOOP_ITERATIONS {
                tracing::error!(
                    iterations,
                    remaining,
                    "drive loop exceeded iteration cap without completing the request"
                );
                return Err(SimulatorError::Bug(
                    "drive loop exceeded iteration cap without completing the request"
                        .to_string(),
                ));
            }

            if self.cycle_used >= MAX_CYCLE {
                self.emit_restart(from, lat, lng);
            }
            self.window.open_if_closed(self.clock.now());

            let avail = (MAX_DRIVING - self.shift_driving)
                .min(self.window.minutes_left(self.clock.now()))
                .min(MAX_DRIVE_BEFORE_BREAK - self.since_break)
                .min(MAX_CYCLE - self.cycle_used);

            if avail <= 0 {
                self.emit_rest(from, lat, lng);
                continue;
            }

            let now = remaining.min(avail);
            let label = if from.is_empty() && to.is_empty() {
                "Driving".to_string()
            } else {
                format!("Driving: {from} \u{2192} {to}")
            };
            self.push_event(DutyStatus::Driving, now, from, lat, lng, label, None);

            self.shift_driving += now;
            self.since_break += now;
            self.cycle_used += now;
            driven_total += now;
            remaining -= now;

            if remaining <= 0 {
                break;
            }

            if self.since_break >= MAX_DRIVE_BEFORE_BREAK {
                self.emit_break(from, lat, lng);
            }
            if self.shift_driving >= MAX_DRIVING || self.window.minutes_left(self.clock.now()) == 0
            {
                self.emit_rest(from, lat, lng);
            }
            if self.cycle_used >= MAX_CYCLE {
                self.emit_restart(from, lat, lng);
            }
        }

        Ok(driven_total)
    }

    fn emit_restart(&mut self, loc: &str, lat: f64, lng: f64) {
        tracing::info!(location = loc, day = self.day, "inserting 34-hour restart");
        self.push_event(
            DutyStatus::Off,
            RESTART,
            loc,
            lat,
            lng,
            "34-hour restart (cycle)".to_string(),
            Some(StopKind::Restart),
        );
        self.reset_shift();
        self.cycle_used = 0;
    }

    fn emit_rest(&mut self, loc: &str, lat: f64, lng: f64) {
        let location = if loc.is_empty() { "Rest area" } else { loc };
        tracing::info!(location, day = self.day, "inserting 10-hour rest");
        self.push_event(
            DutyStatus::Off,
            REST,
            location,
            lat,
            lng,
            "10-hour off-duty rest".to_string(),
            Some(StopKind::Rest),
        );
        self.reset_shift();
    }

    fn emit_break(&mut self, loc: &str, lat: f64, lng: f64) {
        let location = if loc.is_empty() { "Rest area" } else { loc };
        tracing::info!(location, day = self.day, "inserting 30-minute break");
        self.push_event(
            DutyStatus::Off,
            BREAK,
            location,
            lat,
            lng,
            "30-minute break".to_string(),
            Some(StopKind::Break),
        );
        self.since_break = 0;
    }

    fn emit_fuel_stop(&mut self, loc: &str, lat: f64, lng: f64) {
        self.window.open_if_closed(self.clock.now());
        let location = if loc.is_empty() { "Fuel station" } else { loc };
        tracing::info!(location, day = self.day, "inserting fuel stop");
        self.push_event(
            DutyStatus::OnDuty,
            FUEL_DURATION,
            location,
            lat,
            lng,
            "Fuel stop".to_string(),
            Some(StopKind::Fuel),
        );
        self.miles_since_fuel = 0.0;
        self.cycle_used += FUEL_DURATION;
        self.since_break = 0;
    }

    fn on_duty_stop(&mut self, loc: &str, lat: f64, lng: f64, note: &str, kind: StopKind) {
        self.window.open_if_closed(self.clock.now());
        self.push_event(
            DutyStatus::OnDuty,
            PICKUP_DROPOFF_DURATION,
            loc,
            lat,
            lng,
            note.to_string(),
            Some(kind),
        );
        self.cycle_used += PICKUP_DROPOFF_DURATION;
        if PICKUP_DROPOFF_DURATION >= BREAK {
            self.since_break = 0;
        }
    }

    fn reset_shift(&mut self) {
        self.shift_driving = 0;
        self.window.close();
        self.since_break = 0;
    }

    #[allow(clippy::too_many_arguments)]
    fn push_event(
        &mut self,
        status: DutyStatus,
        minutes: i64,
        location: &str,
        lat: f64,
        lng: f64,
        note: String,
        kind: Option<StopKind>,
    ) {
        let start = self.clock.now();
        let end = self.clock.advance(minutes);
        let day = self.day;

        if start.date() != end.date() {
            self.day += (end.date() - start.date()).num_days() as u32;
        }

        self.timeline.push(TimelineEvent {
            status,
            start_time: start,
            end_time: end,
            duration_mins: minutes,
            location: location.to_string(),
            lat,
            lng,
            note,
            day,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn assert_contiguous(sim: &Simulator) {
        for pair in sim.timeline().windows(2) {
            assert_eq!(
                pair[0].end_time, pair[1].start_time,
                "timeline must be contiguous"
            );
        }
    }

    fn assert_legal(sim: &Simulator) {
        // Re-simulate the running counters across the timeline to check the
        // invariants hold after every emitted event, not just at the end.
        let mut shift_driving = 0i64;
        let mut since_break = 0i64;
        let mut cycle_used = 0i64;
        let mut window_start: Option<NaiveDateTime> = None;

        for ev in sim.timeline() {
            match ev.status {
                DutyStatus::Driving => {
                    shift_driving += ev.duration_mins;
                    since_break += ev.duration_mins;
                    cycle_used += ev.duration_mins;
                    if window_start.is_none() {
                        window_start = Some(ev.start_time);
                    }
                }
                DutyStatus::OnDuty => {
                    cycle_used += ev.duration_mins;
                    if window_start.is_none() {
                        window_start = Some(ev.start_time);
                    }
                    if ev.duration_mins >= BREAK {
                        since_break = 0;
                    }
                }
                DutyStatus::Off => {
                    if ev.duration_mins >= RESTART {
                        shift_driving = 0;
                        since_break = 0;
                        cycle_used = 0;
                        window_start = None;
                    } else if ev.duration_mins >= REST {
                        shift_driving = 0;
                        since_break = 0;
                        window_start = None;
                    } else {
                        since_break = 0;
                    }
                }
                DutyStatus::SleeperBerth => unreachable!("simulator never emits SB"),
            }

            assert!(shift_driving <= MAX_DRIVING);
            assert!(since_break <= MAX_DRIVE_BEFORE_BREAK);
            assert!(cycle_used <= MAX_CYCLE);
            if let Some(ws) = window_start {
                assert!((ev.end_time - ws).num_minutes() <= crate::rules::MAX_WINDOW);
            }
        }
    }

    #[test]
    fn new_rejects_out_of_range_cycle_hours() {
        assert!(Simulator::new(-1.0, start()).is_err());
        assert!(Simulator::new(70.0, start()).is_err());
        assert!(Simulator::new(69.9, start()).is_ok());
    }

    #[test]
    fn drive_segment_rejects_negative_miles() {
        let mut sim = Simulator::new(0.0, start()).unwrap();
        assert!(sim.drive_segment(-1.0, "A", "B", 0.0, 0.0, 0.0, 0.0).is_err());
    }

    // Scenario A: 700-mile drive, fresh driver.
    #[test]
    fn scenario_a_long_drive_inserts_break_and_rest() {
        let mut sim = Simulator::new(0.0, start()).unwrap();
        sim.drive_segment(700.0, "Chicago", "Dallas", 0.0, 0.0, 0.0, 0.0)
            .unwrap();

        assert_contiguous(&sim);
        assert_legal(&sim);

        assert!(sim.timeline().iter().any(|e| e.status == DutyStatus::Driving));
        assert!(
            sim.timeline()
                .iter()
                .any(|e| e.note == "30-minute break"),
            "a mandatory break must appear after 8h of driving"
        );
        assert!(
            sim.timeline()
                .iter()
                .any(|e| e.note == "10-hour off-duty rest"),
            "700 miles exceeds the 11h shift cap even after the mandatory break"
        );
        assert!((sim.total_miles() - 700.0).abs() < 1.0);
    }

    // Scenario B: full trip, heavy cycle.
    #[test]
    fn scenario_b_moderate_trip_no_rests_needed() {
        let mut sim = Simulator::new(10.0, start()).unwrap();
        sim.drive_segment(300.0, "Chicago", "Indy", 0.0, 0.0, 0.0, 0.0)
            .unwrap();
        sim.add_pickup("Indy", 0.0, 0.0);
        sim.drive_segment(175.0, "Indy", "Columbus", 0.0, 0.0, 0.0, 0.0)
            .unwrap();
        sim.add_dropoff("Columbus", 0.0, 0.0);

        assert_contiguous(&sim);
        assert_legal(&sim);

        let on_duty_stops = sim
            .timeline()
            .iter()
            .filter(|e| e.status == DutyStatus::OnDuty && e.duration_mins == 60)
            .count();
        assert_eq!(on_duty_stops, 2);

        let rests = sim
            .timeline()
            .iter()
            .filter(|e| e.note.contains("rest"))
            .count();
        assert_eq!(rests, 0);

        let expected_cycle_hours = 10.0 + (300.0 + 175.0) / 55.0 + 2.0;
        let actual_cycle_hours = sim.cycle_used_minutes() as f64 / 60.0;
        assert!((actual_cycle_hours - expected_cycle_hours).abs() < 0.2);
    }

    // Scenario C: cycle exhaustion.
    #[test]
    fn scenario_c_cycle_exhaustion_triggers_restart() {
        let mut sim = Simulator::new(69.5, start()).unwrap();
        sim.drive_segment(100.0, "A", "B", 0.0, 0.0, 0.0, 0.0).unwrap();

        assert_contiguous(&sim);
        assert_legal(&sim);

        let restart = sim
            .timeline()
            .iter()
            .find(|e| e.note == "34-hour restart (cycle)")
            .expect("a 34-hour restart must appear");
        assert_eq!(restart.duration_mins, RESTART);

        // Restart must occur within the first 30 minutes of driving: 0.5h
        // of cycle remains (69.5h used of 70h) before the 70h cap trips.
        let driving_before_restart: i64 = sim
            .timeline()
            .iter()
            .take_while(|e| e.note != "34-hour restart (cycle)")
            .filter(|e| e.status == DutyStatus::Driving)
            .map(|e| e.duration_mins)
            .sum();
        assert!(driving_before_restart <= 30);
    }

    // Scenario D: fuel interval.
    #[test]
    fn scenario_d_fuel_stop_after_1000_miles() {
        let mut sim = Simulator::new(0.0, start()).unwrap();
        sim.drive_segment(1200.0, "A", "B", 0.0, 0.0, 0.0, 0.0).unwrap();

        assert_contiguous(&sim);
        assert_legal(&sim);

        let fuel_stops = sim
            .timeline()
            .iter()
            .filter(|e| e.note == "Fuel stop")
            .count();
        assert_eq!(fuel_stops, 1);
        assert!((sim.total_miles() - 1200.0).abs() < 1.0);
    }

    #[test]
    fn mileage_conserves_across_driving_events() {
        let mut sim = Simulator::new(20.0, start()).unwrap();
        sim.drive_segment(850.0, "A", "B", 0.0, 0.0, 0.0, 0.0).unwrap();

        let drive_miles: f64 = sim
            .timeline()
            .iter()
            .filter(|e| e.status == DutyStatus::Driving)
            .map(|e| (e.duration_mins as f64 / 60.0) * AVG_SPEED_MPH)
            .sum();

        assert!((drive_miles - sim.total_miles()).abs() < 1.0);
    }

    #[test]
    fn zero_mile_segment_is_a_no_op() {
        let mut sim = Simulator::new(0.0, start()).unwrap();
        sim.drive_segment(0.0, "A", "B", 0.0, 0.0, 0.0, 0.0).unwrap();
        assert!(sim.timeline().is_empty());
        assert_eq!(sim.total_miles(), 0.0);
    }

    #[test]
    fn day_counter_advances_across_midnight() {
        let midnight_eve = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        let mut sim = Simulator::new(0.0, midnight_eve).unwrap();
        sim.drive_segment(100.0, "A", "B", 0.0, 0.0, 0.0, 0.0).unwrap();

        let crossed = sim
            .timeline()
            .iter()
            .any(|e| e.end_time.date() > e.start_time.date());
        assert!(crossed, "a ~2h drive from 22:00 should cross midnight");
        assert!(sim.timeline().iter().any(|e| e.day >= 2));
    }

    #[test]
    fn pickup_and_dropoff_carry_explicit_stop_kind() {
        let mut sim = Simulator::new(0.0, start() + Duration::hours(0)).unwrap();
        sim.add_pickup("Warehouse", 1.0, 2.0);
        sim.add_dropoff("Depot", 3.0, 4.0);

        assert_eq!(sim.timeline()[0].kind, Some(StopKind::Pickup));
        assert_eq!(sim.timeline()[1].kind, Some(StopKind::Dropoff));
        assert!(sim.timeline().iter().all(|e| e.status == DutyStatus::OnDuty));
    }
}
