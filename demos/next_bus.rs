use anyhow::{Context, Result};
use tmb::{ArrivalForecast, Client, TransitCatalog};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Set TMB_APP_ID / TMB_APP_KEY, and RUST_LOG=tmb=debug to see requests.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let stop = args.next().context("usage: next_bus <stop code> [line name]")?;
    let line = args.next();

    let client = Client::from_env()?;

    if let Some(line) = &line {
        let catalog = TransitCatalog::with_client(client.clone());
        let found = catalog.find_bus_line(line)?;
        println!("{} ({})", found.name, found.description);
    }

    let forecast = ArrivalForecast::with_client(client);
    let arrivals = forecast.stop_forecast(&stop, line.as_deref())?;
    if arrivals.is_empty() {
        println!("No buses announced at stop {}", stop);
    }
    for arrival in arrivals {
        println!(
            "{:>5}  {}",
            arrival.line.as_deref().or(line.as_deref()).unwrap_or("?"),
            arrival.display_text
        );
    }
    Ok(())
}
