//! Trip planning between two coordinates.
//!
//! The planner answers with full itineraries (every walking and transit leg);
//! [`TripPlanner`] reduces each to an [`ItineraryPlan`] listing only the
//! transit legs.

use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::Client;
use crate::error::TmbError;
use crate::models::{Coordinates, ItineraryPlan};
use crate::util::{round_half_even, seconds_to_minutes};

const PLAN_PATH: [&str; 2] = ["planner", "plan"];
const WALK_MODE: &str = "WALK";

#[derive(Debug, Deserialize)]
struct PlanResponse {
    plan: Plan,
}

#[derive(Debug, Deserialize)]
struct Plan {
    #[serde(default)]
    itineraries: Vec<RawItinerary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItinerary {
    duration: u64,
    walk_distance: f64,
    transit_time: u64,
    waiting_time: u64,
    transfers: u32,
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    mode: String,
    // Walking legs come without a route.
    #[serde(default)]
    route: Option<String>,
    from: RawPlace,
    to: RawPlace,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    name: String,
}

impl RawItinerary {
    /// Fails when a transit leg has no route to report.
    fn summarize(&self) -> Result<ItineraryPlan, String> {
        let mut routes = Vec::new();
        let mut legs = Vec::new();
        for leg in self.legs.iter().filter(|l| l.mode != WALK_MODE) {
            let route = leg
                .route
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| {
                    format!("{} leg from {:?} has no route", leg.mode, leg.from.name)
                })?;
            routes.push(route);
            legs.push(format!("{} ({} - {})", route, leg.from.name, leg.to.name));
        }

        Ok(ItineraryPlan {
            overview: routes.join(", "),
            description: legs.join(", "),
            duration_minutes: seconds_to_minutes(self.duration),
            duration_seconds: self.duration,
            transit_seconds: self.transit_time,
            waiting_seconds: self.waiting_time,
            walk_distance_meters: round_half_even(self.walk_distance),
            transfer_count: self.transfers,
        })
    }
}

/// Client for the TMB trip planner.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    client: Client,
}

impl TripPlanner {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Result<Self, TmbError> {
        Ok(Self::with_client(Client::new(app_id, app_key)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Transit+walk itineraries departing now (local time).
    #[instrument(skip(self))]
    pub fn list_itineraries(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<Vec<ItineraryPlan>, TmbError> {
        self.list_itineraries_at(from, to, Local::now().naive_local())
    }

    /// Transit+walk itineraries departing at `departure` (local time).
    #[instrument(skip(self))]
    pub fn list_itineraries_at(
        &self,
        from: Coordinates,
        to: Coordinates,
        departure: NaiveDateTime,
    ) -> Result<Vec<ItineraryPlan>, TmbError> {
        let url = self.client.endpoint(&PLAN_PATH)?;
        let params = plan_params(from, to, departure);
        let body: PlanResponse = self.client.fetch_json(url.clone(), &params)?;
        debug!(count = body.plan.itineraries.len(), "itineraries fetched");

        body.plan
            .itineraries
            .iter()
            .map(|i| {
                i.summarize().map_err(|reason| TmbError::MalformedResponse {
                    url: url.to_string(),
                    reason,
                })
            })
            .collect()
    }

    /// The quickest itinerary departing now.
    #[instrument(skip(self))]
    pub fn shortest_itinerary(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<ItineraryPlan, TmbError> {
        self.shortest_itinerary_at(from, to, Local::now().naive_local())
    }

    /// The quickest itinerary departing at `departure`. Ties keep the one the
    /// planner listed first.
    #[instrument(skip(self))]
    pub fn shortest_itinerary_at(
        &self,
        from: Coordinates,
        to: Coordinates,
        departure: NaiveDateTime,
    ) -> Result<ItineraryPlan, TmbError> {
        let plans = self.list_itineraries_at(from, to, departure)?;
        shortest(plans).ok_or(TmbError::NoItineraries { from, to })
    }
}

fn plan_params(
    from: Coordinates,
    to: Coordinates,
    departure: NaiveDateTime,
) -> Vec<(&'static str, String)> {
    vec![
        ("fromPlace", from.to_string()),
        ("toPlace", to.to_string()),
        ("date", departure.format("%m-%d-%Y").to_string()),
        ("time", departure.format("%I:%M%p").to_string()),
        ("arriveBy", "false".to_string()),
        ("mode", "TRANSIT,WALK".to_string()),
    ]
}

/// First plan with the minimum `duration_minutes`.
fn shortest(plans: Vec<ItineraryPlan>) -> Option<ItineraryPlan> {
    plans.into_iter().min_by_key(|p| p.duration_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn leg(mode: &str, route: &str, from: &str, to: &str) -> RawLeg {
        RawLeg {
            mode: mode.to_string(),
            route: Some(route.to_string()).filter(|r| !r.is_empty()),
            from: RawPlace {
                name: from.to_string(),
            },
            to: RawPlace {
                name: to.to_string(),
            },
        }
    }

    fn itinerary(duration: u64, legs: Vec<RawLeg>) -> RawItinerary {
        RawItinerary {
            duration,
            walk_distance: 412.6,
            transit_time: 900,
            waiting_time: 120,
            transfers: 1,
            legs,
        }
    }

    fn plan(duration_minutes: u64, overview: &str) -> ItineraryPlan {
        ItineraryPlan {
            overview: overview.to_string(),
            description: String::new(),
            duration_minutes,
            duration_seconds: duration_minutes * 60,
            transit_seconds: 0,
            waiting_seconds: 0,
            walk_distance_meters: 0,
            transfer_count: 0,
        }
    }

    #[test]
    fn walking_legs_are_left_out() {
        let raw = itinerary(
            125,
            vec![
                leg("WALK", "", "Origin", "A"),
                leg("BUS", "V21", "A", "B"),
                leg("WALK", "", "B", "B"),
                leg("SUBWAY", "L1", "B", "C"),
            ],
        );
        let plan = raw.summarize().unwrap();
        assert_eq!(plan.overview, "V21, L1");
        assert_eq!(plan.description, "V21 (A - B), L1 (B - C)");
        assert_eq!(plan.duration_minutes, 2);
        assert_eq!(plan.duration_seconds, 125);
        assert_eq!(plan.walk_distance_meters, 413);
        assert_eq!(plan.transit_seconds, 900);
        assert_eq!(plan.waiting_seconds, 120);
        assert_eq!(plan.transfer_count, 1);
    }

    #[test]
    fn walk_only_itinerary_has_empty_summary() {
        let plan = itinerary(600, vec![leg("WALK", "", "X", "Y")])
            .summarize()
            .unwrap();
        assert_eq!(plan.overview, "");
        assert_eq!(plan.description, "");
    }

    #[test]
    fn transit_leg_without_route_is_rejected() {
        let raw = itinerary(
            600,
            vec![leg("BUS", "V21", "A", "B"), leg("SUBWAY", "", "B", "C")],
        );
        let reason = raw.summarize().unwrap_err();
        assert!(reason.contains("SUBWAY"));
        assert!(reason.contains("\"B\""));
    }

    #[test]
    fn half_minute_rounds_to_even() {
        assert_eq!(itinerary(90, vec![]).summarize().unwrap().duration_minutes, 2);
        assert_eq!(itinerary(150, vec![]).summarize().unwrap().duration_minutes, 2);
    }

    #[test]
    fn shortest_keeps_first_on_ties() {
        let best = shortest(vec![plan(10, "a"), plan(5, "b"), plan(5, "c")]).unwrap();
        assert_eq!(best.overview, "b");
    }

    #[test]
    fn shortest_of_nothing_is_none() {
        assert!(shortest(Vec::new()).is_none());
    }

    #[test]
    fn request_uses_provider_date_and_time_format() {
        let departure = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(21, 5, 0)
            .unwrap();
        let params = plan_params(
            Coordinates::new(41.3851, 2.1734),
            Coordinates::new(41.4036, 2.1744),
            departure,
        );
        assert!(params.contains(&("fromPlace", "41.3851,2.1734".to_string())));
        assert!(params.contains(&("toPlace", "41.4036,2.1744".to_string())));
        assert!(params.contains(&("date", "03-07-2026".to_string())));
        assert!(params.contains(&("time", "09:05PM".to_string())));
        assert!(params.contains(&("arriveBy", "false".to_string())));
        assert!(params.contains(&("mode", "TRANSIT,WALK".to_string())));
    }

    #[test]
    fn parses_planner_payload() {
        let json = r#"{
            "plan": {"itineraries": [{
                "duration": 1530, "walkDistance": 220.37, "transitTime": 1200,
                "waitingTime": 90, "transfers": 0,
                "legs": [
                    {"mode": "WALK", "from": {"name": "Origin"}, "to": {"name": "Pl. Catalunya"}},
                    {"mode": "BUS", "route": "V15", "from": {"name": "Pl. Catalunya"}, "to": {"name": "Sagrada Família"}}
                ]
            }]}
        }"#;
        let body: PlanResponse = serde_json::from_str(json).unwrap();
        let plan = body.plan.itineraries[0].summarize().unwrap();
        assert_eq!(plan.overview, "V15");
        assert_eq!(plan.description, "V15 (Pl. Catalunya - Sagrada Família)");
        assert_eq!(plan.duration_minutes, 26);
        assert_eq!(plan.walk_distance_meters, 220);
    }
}
