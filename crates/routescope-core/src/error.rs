//! Error types shared by the route and annotation paths.

use thiserror::Error;

/// Failure of a top-level route request. These are surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("{}", bad_response_message(.status, .message))]
    BadResponse {
        status: Option<u16>,
        message: String,
    },
    #[error("route response is missing route geometry")]
    NoGeometry,
}

impl RouteError {
    pub fn bad_response(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::BadResponse {
            status,
            message: message.into(),
        }
    }
}

fn bad_response_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("HTTP error! status: {} ({})", status, message),
        None => format!("bad response: {}", message),
    }
}

/// Failure of a single per-point annotation lookup. Absorbed by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("bad response: {0}")]
    BadResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate pair '{0}', expected \"lat,lng\"")]
pub struct ParsePointError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid vehicle type '{0}'. Must be one of: car, truck, bicycle, pedestrian")]
pub struct InvalidVehicleType(pub String);
