//! End-to-end tests of the trip-planning pipeline: geocode, route, simulate
//! HOS, build daily logs, export CSV — wired together the way `main.rs`
//! wires them, but with fixture collaborators instead of live HTTP calls.

mod common;

use std::sync::Arc;

use eld_trip_planner::io::export::{write_daily_logs_csv, write_timeline_csv};
use eld_trip_planner::planner::TripPlanner;

use common::{FailingRouter, FixtureGeocoder, FixtureRouter};

/// A short two-leg trip with plenty of cycle hours remaining should produce
/// no rest or restart stops, only the mandatory pickup/dropoff.
#[tokio::test]
async fn short_trip_needs_no_rest_stops() {
    let planner = TripPlanner::new(
        Arc::new(FixtureGeocoder),
        Arc::new(FixtureRouter::new(150.0, 180.0)),
    );

    let response = planner
        .plan_trip("Chicago, IL", "Indianapolis, IN", "Columbus, OH", 0.0)
        .await
        .unwrap();

    assert_eq!(response.route.legs.len(), 2);
    assert!((response.route.total_distance_miles - 300.0).abs() < 1.0);
    assert_eq!(response.summary.total_days, 1);

    let rest_stops: Vec<_> = response
        .stops
        .iter()
        .filter(|s| s.kind == "rest" || s.kind == "break")
        .collect();
    assert!(rest_stops.is_empty(), "short trip should need no rest/break stops");

    let pickup_stops: Vec<_> = response.stops.iter().filter(|s| s.kind == "pickup").collect();
    let dropoff_stops: Vec<_> = response.stops.iter().filter(|s| s.kind == "dropoff").collect();
    assert_eq!(pickup_stops.len(), 1);
    assert_eq!(dropoff_stops.len(), 1);
}

/// A long-haul trip (two 700-mile legs) exhausts the driving window and the
/// 70-hour cycle, forcing rest and eventually a 34-hour restart.
#[tokio::test]
async fn long_haul_trip_requires_rest_and_restart_stops() {
    let planner = TripPlanner::new(
        Arc::new(FixtureGeocoder),
        Arc::new(FixtureRouter::new(700.0, 700.0 / 55.0 * 60.0)),
    );

    let response = planner
        .plan_trip("Chicago, IL", "Denver, CO", "Cheyenne, WY", 60.0)
        .await
        .unwrap();

    assert!(response.summary.total_days > 1);
    assert!(
        response.stops.iter().any(|s| s.kind == "rest"),
        "a 1400-mile trip starting with 60 cycle hours used must rest"
    );

    // Every timeline event should be contiguous: each event's start equals
    // the previous event's end.
    for pair in response.timeline.windows(2) {
        assert_eq!(pair[0].end_time, pair[1].start_time);
    }
}

/// When routing fails, the orchestrator returns an error rather than a
/// partial response.
#[tokio::test]
async fn routing_failure_short_circuits_the_pipeline() {
    let planner = TripPlanner::new(Arc::new(FixtureGeocoder), Arc::new(FailingRouter));

    let err = planner
        .plan_trip("Chicago, IL", "Indianapolis, IN", "Columbus, OH", 10.0)
        .await
        .unwrap_err();

    assert!(!err.is_internal_bug());
}

/// The full pipeline's output round-trips cleanly through the CSV exporter.
#[tokio::test]
async fn planned_trip_exports_to_csv() {
    let planner = TripPlanner::new(
        Arc::new(FixtureGeocoder),
        Arc::new(FixtureRouter::new(200.0, 220.0)),
    );

    let response = planner
        .plan_trip("Chicago, IL", "Indianapolis, IN", "Columbus, OH", 5.0)
        .await
        .unwrap();

    let mut timeline_buf = Vec::new();
    write_timeline_csv(&response.timeline, &mut timeline_buf).unwrap();
    let timeline_csv = String::from_utf8(timeline_buf).unwrap();
    assert_eq!(timeline_csv.lines().count(), response.timeline.len() + 1);

    let mut logs_buf = Vec::new();
    write_daily_logs_csv(&response.daily_logs, &mut logs_buf).unwrap();
    let logs_csv = String::from_utf8(logs_buf).unwrap();
    assert!(logs_csv.lines().count() > 1);
}
