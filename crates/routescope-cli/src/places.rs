//! Turning user input into route endpoints.

use anyhow::{Context, Result};
use routescope_client::{GeocodeClient, Place};
use routescope_core::Point;

/// Input that is already a `lat,lng` pair needs no geocoding.
pub fn parse_place(input: &str) -> Option<Place> {
    let input = input.trim();
    input
        .parse::<Point>()
        .ok()
        .map(|point| Place::new(input, point))
}

/// Resolve an address or coordinate pair, taking the first geocoder suggestion.
pub async fn resolve_place(input: &str, geocoder: &GeocodeClient) -> Result<Place> {
    if let Some(place) = parse_place(input) {
        return Ok(place);
    }
    let suggestions = geocoder
        .suggest(input)
        .await
        .with_context(|| format!("could not look up '{}'", input.trim()))?;
    let first = suggestions
        .into_iter()
        .next()
        .with_context(|| format!("no match found for '{}'", input.trim()))?;
    tracing::debug!("Resolved '{}' to {} ({})", input.trim(), first.name, first.point);
    Ok(Place::new(first.name, first.point))
}
