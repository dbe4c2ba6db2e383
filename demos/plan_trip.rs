use anyhow::{Context, Result};
use tmb::{Client, Coordinates, TripPlanner};
use tracing_subscriber::EnvFilter;

fn parse_place(arg: Option<String>) -> Result<Coordinates> {
    let arg = arg.context("usage: plan_trip <lat,lon> <lat,lon>")?;
    let (lat, lon) = arg
        .split_once(',')
        .with_context(|| format!("expected lat,lon but got {}", arg))?;
    Ok(Coordinates::new(lat.trim().parse()?, lon.trim().parse()?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let from = parse_place(args.next())?;
    let to = parse_place(args.next())?;

    let planner = TripPlanner::with_client(Client::from_env()?);
    for plan in planner.list_itineraries(from, to)? {
        println!(
            "{:>3} min  {:>4} m walk  {}",
            plan.duration_minutes, plan.walk_distance_meters, plan.description
        );
    }

    let best = planner.shortest_itinerary(from, to)?;
    println!("\nQuickest: {} ({} min)", best.overview, best.duration_minutes);
    Ok(())
}
