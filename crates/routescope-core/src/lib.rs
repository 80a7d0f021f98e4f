//! Route sampling, annotation aggregation and request sequencing.

pub mod annotate;
pub mod error;
pub mod models;
pub mod sampling;
pub mod session;
pub mod summary;

pub use annotate::{
    aggregate, annotate_route, fetch_all, Annotation, AnnotationKind, AnnotationProvider,
    AnnotationRecord, RouteAnnotationSet, SummarySlot,
};
pub use error::{AnnotationError, InvalidVehicleType, ParsePointError, RouteError};
pub use models::{
    AirQualityReading, Guidance, IncidentKind, Instruction, LatLng, Point, Route, RouteGeometry,
    RouteResponse, RouteSummary, Suggestion, TrafficIncident, TrafficResponse, VehicleType,
    WeatherHeadline, WeatherSample,
};
pub use sampling::{sample, sample_indices, AIR_QUALITY_SAMPLES, WEATHER_SAMPLES};
pub use session::{
    AnnotationLayers, Generation, LayerToggles, Outcome, RouteSession, RouteState, RouteView,
    SessionSnapshot,
};
pub use summary::{
    build_prompt, format_instruction, traffic_bounding_box, weather_description, AqiLevel,
    BoundingBox, TripFacts,
};
