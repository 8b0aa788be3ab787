//! Trip-planning orchestrator: geocode → route → simulate HOS → build daily
//! logs → assemble the public response.

pub mod geocoder;
pub mod ratelimit;
pub mod router;
pub mod types;

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Timelike};

pub use geocoder::{Geocoder, NominatimGeocoder};
pub use ratelimit::RateLimiter;
pub use router::{OpenRouteServiceRouter, Router};
pub use types::{
    GeocodingError, PlanTripResponse, RouteLeg, RouteLegResponse, RouteSummary, RoutingError,
    StopMarker, Summary, TripPlannerError,
};

use crate::hos::{Simulator, StopKind, TimelineEvent};
use crate::log_builder::build_daily_logs;

/// Drives the geocoder and router collaborators, then the [`Simulator`] and
/// [`crate::log_builder`], and assembles the `/api/plan-trip/` response.
///
/// Holds its collaborators as trait objects rather than concrete types so
/// callers (including tests) can substitute deterministic fakes without
/// performing network I/O.
pub struct TripPlanner {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn Router>,
}

impl TripPlanner {
    /// Builds an orchestrator over the given collaborators.
    pub fn new(geocoder: Arc<dyn Geocoder>, router: Arc<dyn Router>) -> Self {
        Self { geocoder, router }
    }

    /// Runs the full planning pipeline for one trip.
    ///
    /// # Errors
    ///
    /// Returns [`TripPlannerError`] if any collaborator call or the
    /// simulator fails. No partial result is ever returned.
    pub async fn plan_trip(
        &self,
        current_location: &str,
        pickup_location: &str,
        dropoff_location: &str,
        cycle_used_hours: f64,
    ) -> Result<PlanTripResponse, TripPlannerError> {
        let current = self.geocoder.geocode(current_location).await?;
        let pickup = self.geocoder.geocode(pickup_location).await?;
        let dropoff = self.geocoder.geocode(dropoff_location).await?;

        let leg1 = self.router.route(current, pickup).await?;
        let leg2 = self.router.route(pickup, dropoff).await?;

        let start_time = now_truncated_to_minute();
        let mut sim = Simulator::new(cycle_used_hours, start_time)?;

        sim.drive_segment(
            leg1.distance_miles,
            current_location,
            pickup_location,
            current.0,
            current.1,
            pickup.0,
            pickup.1,
        )?;
        sim.add_pickup(pickup_location, pickup.0, pickup.1);

        sim.drive_segment(
            leg2.distance_miles,
            pickup_location,
            dropoff_location,
            pickup.0,
            pickup.1,
            dropoff.0,
            dropoff.1,
        )?;
        sim.add_dropoff(dropoff_location, dropoff.0, dropoff.1);

        let timeline = sim.timeline().to_vec();
        let daily_logs = build_daily_logs(&timeline, "");
        let stops = build_stops(&timeline);

        let route = RouteSummary {
            legs: vec![
                leg_response(current_location, pickup_location, &leg1),
                leg_response(pickup_location, dropoff_location, &leg2),
            ],
            total_distance_miles: round1(leg1.distance_miles + leg2.distance_miles),
            total_duration_hours: round1((leg1.duration_minutes + leg2.duration_minutes) / 60.0),
        };

        let summary = Summary {
            total_days: daily_logs.len(),
            total_driving_miles: sim.total_miles(),
            cycle_hours_at_start: cycle_used_hours,
            cycle_hours_at_end: round1(sim.cycle_used_minutes() as f64 / 60.0),
        };

        Ok(PlanTripResponse {
            route,
            timeline,
            daily_logs,
            stops,
            summary,
        })
    }
}

fn now_truncated_to_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.date()
        .and_hms_opt(now.hour(), now.minute(), 0)
        .unwrap_or(now)
}

fn leg_response(from: &str, to: &str, leg: &RouteLeg) -> RouteLegResponse {
    RouteLegResponse {
        from: from.to_string(),
        to: to.to_string(),
        distance_miles: round1(leg.distance_miles),
        duration_hours: round1(leg.duration_minutes / 60.0),
        geometry: leg.geometry.clone(),
    }
}

/// Pulls every non-driving event into a map-display stop marker, reading
/// each event's explicit `StopKind` instead of inferring it from its note
/// string.
fn build_stops(timeline: &[TimelineEvent]) -> Vec<StopMarker> {
    timeline
        .iter()
        .filter(|ev| !ev.is_driving())
        .map(|ev| StopMarker {
            kind: ev.kind.map_or("stop", StopKind::as_wire_str),
            location: ev.location.clone(),
            lat: ev.lat,
            lng: ev.lng,
            start_time: ev.start_time,
            duration_mins: ev.duration_mins,
            note: ev.note.clone(),
        })
        .collect()
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
