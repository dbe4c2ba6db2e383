//! A small blocking Rust client for the TMB (Transports Metropolitans de
//! Barcelona) API.
//!
//! Three independent clients cover the API areas:
//! - [`TransitCatalog`]: bus and metro lines, stops of a bus line.
//! - [`ArrivalForecast`]: real-time iBus arrival countdowns for a stop.
//! - [`TripPlanner`]: itineraries between two coordinates.
//!
//! Every call is one fetch-transform-return cycle: no caching, no retries.
//! Each request carries the application credentials as `app_id`/`app_key`
//! query parameters and a 10 second timeout by default.
//!
//! ## Quick start
//! - Register an application at <https://developer.tmb.cat> to get an
//!   `app_id` and `app_key`.
//! - Pass them to the client constructors, or export `TMB_APP_ID` /
//!   `TMB_APP_KEY` and use [`Client::from_env`].
//!
//! ```no_run
//! use tmb::{ArrivalForecast, Client, Coordinates, TripPlanner};
//!
//! fn main() -> Result<(), tmb::TmbError> {
//!     let client = Client::from_env()?;
//!
//!     let forecast = ArrivalForecast::with_client(client.clone());
//!     for arrival in forecast.stop_forecast("108", None)? {
//!         println!("{:?} {}", arrival.line, arrival.display_text);
//!     }
//!
//!     let planner = TripPlanner::with_client(client);
//!     let best = planner.shortest_itinerary(
//!         Coordinates::new(41.3851, 2.1734),
//!         Coordinates::new(41.4036, 2.1744),
//!     )?;
//!     println!("{} in {} min", best.overview, best.duration_minutes);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod catalog;
mod client;
mod config;
mod error;
mod forecast;
mod models;
mod planner;
mod util;

pub use catalog::TransitCatalog;
pub use client::{Client, ClientConfig};
pub use error::TmbError;
pub use forecast::ArrivalForecast;
pub use models::{ArrivalEntry, Coordinates, ItineraryPlan, Line, Stop};
pub use planner::TripPlanner;
