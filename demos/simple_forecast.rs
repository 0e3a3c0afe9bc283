use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use weatherkit::{Client, Credentials, UnitSystem, WeatherRequest};

/// Prints the daily forecast for one location.
#[derive(Debug, Parser)]
#[command(name = "simple_forecast", about = "WeatherKit daily forecast")]
struct Args {
    /// The team ID for your WeatherKit account
    team_id: String,
    /// The service ID for your WeatherKit account
    service_id: String,
    /// The key ID for your WeatherKit account
    key_id: String,
    /// The path to the key file for your WeatherKit account
    key_path: String,
    /// Latitude of the location to forecast
    #[arg(allow_hyphen_values = true)]
    latitude: f64,
    /// Longitude of the location to forecast
    #[arg(allow_hyphen_values = true)]
    longitude: f64,
    /// Show Celsius, millimetres and km/h instead of imperial units
    #[arg(long)]
    metric: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let credentials = Credentials::new(args.team_id, args.service_id, args.key_id, args.key_path);
    let client = Client::new(credentials)?;

    let units = UnitSystem::from(!args.metric);
    let request = WeatherRequest::new(args.latitude, args.longitude);
    for day in client.get_simple_forecast(&request, units)? {
        println!(
            "{}: {} with a high of {} and a low of {}",
            day.day_of_week(),
            day.daytime_icon(),
            day.temperature_high().round(),
            day.temperature_low().round()
        );
    }
    Ok(())
}
