//! Plan a route and annotate it with air quality, weather and traffic.
//!
//! Endpoints may be addresses (geocoded, first match wins) or `lat,lng` pairs.

use anyhow::bail;
use clap::Parser;
use routescope_cli::{init_tracing, render_report, resolve_place};
use routescope_client::{ClientConfig, ConsoleSpeech, GeocodeClient, RoutePlanner, RouteRequest};
use routescope_core::{LayerToggles, RouteState, VehicleType};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Start address or "lat,lng"
    #[arg(long)]
    from: String,

    /// Destination address or "lat,lng"
    #[arg(long)]
    to: String,

    /// Travel mode: car, truck, bicycle or pedestrian
    #[arg(long, default_value = "car")]
    vehicle: VehicleType,

    /// Skip traffic incidents
    #[arg(long)]
    no_traffic: bool,

    /// Skip air-quality samples
    #[arg(long)]
    no_air_quality: bool,

    /// Skip weather samples
    #[arg(long)]
    no_weather: bool,

    /// Skip the spoken trip summary
    #[arg(long)]
    no_summary: bool,

    /// Routing backend URL (overrides ROUTESCOPE_BACKEND_URL)
    #[arg(long)]
    backend: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("routescope_client=info")?;
    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(backend) = args.backend {
        config.backend_url = backend;
    }

    let geocoder = GeocodeClient::new(
        &config.geocode_url,
        &config.geocode_api_key,
        config.http_timeout(),
    );
    let (source, destination) = tokio::try_join!(
        resolve_place(&args.from, &geocoder),
        resolve_place(&args.to, &geocoder)
    )?;

    println!("Using backend {}", config.backend_url);
    if !args.no_summary && !config.summary_enabled() {
        println!("GEMINI_API_KEY not set, skipping trip summary");
    }

    let request = RouteRequest {
        source,
        destination,
        vehicle: args.vehicle,
        layers: LayerToggles {
            traffic: !args.no_traffic,
            air_quality: !args.no_air_quality,
            weather: !args.no_weather,
        },
        summary: !args.no_summary,
    };
    let planner = RoutePlanner::from_config(&config, Arc::new(ConsoleSpeech));
    let snapshot = planner.plan(&request).await;

    match &snapshot.state {
        RouteState::Ready(_) => {
            println!();
            print!("{}", render_report(&request, &snapshot));
            Ok(())
        }
        RouteState::Error(message) => bail!("route request failed: {}", message),
        other => bail!("route request ended in state {}", other.name()),
    }
}
