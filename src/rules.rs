//! FMCSA Hours-of-Service constants for property-carrying drivers on the
//! 70-hour / 8-day cycle (49 CFR Part 395).
//!
//! Every value here is a duration in minutes or a distance in miles; the
//! simulator never hardcodes a regulation number inline.

/// Maximum driving minutes allowed in a single shift (11 hours).
pub const MAX_DRIVING: i64 = 660;

/// Maximum on-duty window in a single shift, wall-clock from first on-duty
/// activity (14 hours).
pub const MAX_WINDOW: i64 = 840;

/// Maximum continuous driving minutes before a mandatory 30-minute break
/// (8 hours).
pub const MAX_DRIVE_BEFORE_BREAK: i64 = 480;

/// Off-duty minutes that reset the shift counters (10 hours).
pub const REST: i64 = 600;

/// Mandatory mid-shift break duration (30 minutes).
pub const BREAK: i64 = 30;

/// Off-duty minutes that reset the 70-hour cycle (34 hours).
pub const RESTART: i64 = 2040;

/// Maximum minutes countable against the rolling 70-hour / 8-day cycle.
pub const MAX_CYCLE: i64 = 4200;

/// Distance between mandatory fuel stops, in miles.
pub const FUEL_INTERVAL_MI: f64 = 1000.0;

/// Fuel stop duration in minutes.
pub const FUEL_DURATION: i64 = 30;

/// Pickup and dropoff stop duration in minutes (on-duty, not driving).
pub const PICKUP_DROPOFF_DURATION: i64 = 60;

/// Average road speed used to convert miles to driving minutes, in mph.
pub const AVG_SPEED_MPH: f64 = 55.0;

/// Upper (exclusive) bound on cycle hours accepted by [`crate::hos::Simulator::new`].
pub const MAX_CYCLE_HOURS_INPUT: f64 = 70.0;
