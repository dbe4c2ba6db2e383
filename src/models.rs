//! Typed values returned by the TMB clients.
//!
//! Everything here is built fresh from one API response and handed to the
//! caller by value.

use std::fmt;

use serde::Serialize;

/// A bus or metro line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// Internal TMB line code (`CODI_LINIA`), used to address the line's stops.
    pub code: u32,
    /// Public line name, e.g. `V21` or `L3`.
    pub name: String,
    /// `"<origin> - <destination>"`.
    pub description: String,
}

/// A stop served by a bus line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    pub code: u32,
    /// Name of the line this stop was listed for.
    pub line: String,
    pub name: String,
    /// Street address.
    pub description: String,
}

/// One predicted arrival at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalEntry {
    /// Line of the arriving bus. Only set for stop-wide forecasts; a
    /// forecast filtered to one line leaves it implicit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    pub route_id: String,
    pub minutes_remaining: u32,
    pub seconds_remaining: u32,
    /// Human readable countdown as shown on stop displays, e.g. `"3 min"`.
    pub display_text: String,
}

/// A summarized trip proposal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryPlan {
    /// Routes of the transit legs, e.g. `"V21, L1"`.
    pub overview: String,
    /// Transit legs with their endpoints, e.g. `"V21 (A - B), L1 (B - C)"`.
    pub description: String,
    pub duration_minutes: u64,
    pub duration_seconds: u64,
    pub transit_seconds: u64,
    pub waiting_seconds: u64,
    pub walk_distance_meters: u64,
    pub transfer_count: u32,
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Renders as the planner's `lat,lon` place syntax.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_place_syntax() {
        assert_eq!(Coordinates::new(41.3851, 2.1734).to_string(), "41.3851,2.1734");
        assert_eq!(Coordinates::from((41.0, -2.5)).to_string(), "41,-2.5");
    }

    #[test]
    fn arrival_entry_skips_missing_line() {
        let entry = ArrivalEntry {
            line: None,
            route_id: "211".to_string(),
            minutes_remaining: 3,
            seconds_remaining: 187,
            display_text: "3 min".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("line").is_none());
        assert_eq!(json["minutes_remaining"], 3);
    }
}
