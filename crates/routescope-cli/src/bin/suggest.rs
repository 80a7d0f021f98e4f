//! Print address suggestions for a free-text query.

use anyhow::Context;
use clap::Parser;
use routescope_cli::init_tracing;
use routescope_client::{ClientConfig, GeocodeClient};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address or place name
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("routescope_client=info")?;
    let args = Args::parse();
    let query = args.query.join(" ");

    let config = ClientConfig::from_env();
    let geocoder = GeocodeClient::new(
        &config.geocode_url,
        &config.geocode_api_key,
        config.http_timeout(),
    );
    let suggestions = geocoder
        .suggest(&query)
        .await
        .with_context(|| format!("suggestion lookup for '{}' failed", query))?;

    if suggestions.is_empty() {
        println!("No suggestions for '{}'", query);
        return Ok(());
    }
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("{:>2}. {} ({})", i + 1, suggestion.name, suggestion.point);
    }
    Ok(())
}
