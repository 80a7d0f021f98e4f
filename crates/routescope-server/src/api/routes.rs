//! Proxy endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use routescope_core::{Point, VehicleType};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/route", get(route))
        .route("/air-quality", get(air_quality))
        .route("/traffic-incidents", get(traffic_incidents))
}

// === Request types ===

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AirQualityQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrafficQuery {
    pub bounding_box: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Four comma-separated finite numbers; keeps the value safe to splice into a path.
fn is_bounding_box(value: &str) -> bool {
    let parts: Vec<&str> = value.split(',').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|part| part.trim().parse::<f64>().is_ok_and(f64::is_finite))
}

// === Handlers ===

async fn route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(source), Some(destination)) = (present(query.source), present(query.destination))
    else {
        return Err(ApiError::bad_request(
            "Missing 'source' or 'destination' parameter",
        ));
    };
    let source: Point = source
        .parse()
        .map_err(|err: routescope_core::ParsePointError| ApiError::bad_request(err.to_string()))?;
    let destination: Point = destination
        .parse()
        .map_err(|err: routescope_core::ParsePointError| ApiError::bad_request(err.to_string()))?;

    let vehicle: VehicleType = present(query.vehicle_type)
        .ok_or_else(|| ApiError::bad_request("Vehicle type parameter is missing"))?
        .parse()
        .map_err(|err: routescope_core::InvalidVehicleType| {
            ApiError::bad_request(err.to_string())
        })?;

    tracing::info!("Route {} -> {} ({})", source, destination, vehicle);
    let body = state.upstream.route(source, destination, vehicle).await?;
    Ok(Json(body))
}

async fn air_quality(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AirQualityQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(lat), Some(lon)) = (present(query.lat), present(query.lon)) else {
        return Err(ApiError::bad_request("Missing 'lat' or 'lon' parameter"));
    };
    let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return Err(ApiError::bad_request(
            "Invalid 'lat' or 'lon' value. Must be numbers.",
        ));
    };

    tracing::debug!("Air quality at {},{}", lat, lon);
    let body = state.upstream.air_quality(lat, lon).await?;
    Ok(Json(body))
}

async fn traffic_incidents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrafficQuery>,
) -> Result<Json<Value>, ApiError> {
    let bounding_box = present(query.bounding_box)
        .ok_or_else(|| ApiError::bad_request("Missing 'bounding_box' parameter"))?;
    if !is_bounding_box(&bounding_box) {
        return Err(ApiError::bad_request(
            "Invalid 'bounding_box' value. Expected 'south,west,north,east'.",
        ));
    }

    tracing::debug!("Traffic incidents in {}", bounding_box);
    let body = state.upstream.traffic_incidents(&bounding_box).await?;
    Ok(Json(body))
}
