//! Core data models for routes and their annotations.

use crate::error::{AnnotationError, InvalidVehicleType, ParsePointError, RouteError};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Renders the `lat,lng` form used in backend query strings.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for Point {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePointError(s.to_string());
        let (lat, lon) = s.trim().split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(invalid());
        }
        Ok(Self { lat, lon })
    }
}

/// Ordered path of a route in travel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteGeometry {
    points: Vec<Point>,
}

impl RouteGeometry {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for RouteGeometry {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for RouteGeometry {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    Car,
    Truck,
    Bicycle,
    Pedestrian,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Car,
        VehicleType::Truck,
        VehicleType::Bicycle,
        VehicleType::Pedestrian,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Truck => "truck",
            VehicleType::Bicycle => "bicycle",
            VehicleType::Pedestrian => "pedestrian",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = InvalidVehicleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleType::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| InvalidVehicleType(s.to_string()))
    }
}

// === Routing backend response ===

/// Response of `GET /route`, in the TomTom Routing API shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub summary: Option<RouteSummary>,
    #[serde(default)]
    pub guidance: Option<Guidance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub length_in_meters: f64,
    pub travel_time_in_seconds: f64,
    #[serde(default)]
    pub traffic_delay_in_seconds: f64,
    #[serde(default)]
    pub departure_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub arrival_time: Option<DateTime<FixedOffset>>,
}

impl RouteSummary {
    pub fn distance_km(&self) -> f64 {
        self.length_in_meters / 1000.0
    }

    pub fn travel_minutes(&self) -> i64 {
        (self.travel_time_in_seconds / 60.0).round() as i64
    }

    /// Traffic delay in whole minutes, `None` when there is no delay.
    pub fn delay_minutes(&self) -> Option<i64> {
        (self.traffic_delay_in_seconds > 0.0)
            .then(|| (self.traffic_delay_in_seconds / 60.0).round() as i64)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Guidance {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLng> for Point {
    fn from(value: LatLng) -> Self {
        Point::new(value.latitude, value.longitude)
    }
}

/// One turn-by-turn guidance step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub point: LatLng,
    #[serde(default)]
    pub maneuver: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub route_offset_in_meters: Option<f64>,
    #[serde(default)]
    pub travel_time_in_seconds: Option<f64>,
    /// Number or string depending on the provider version.
    #[serde(default)]
    pub roundabout_exit_number: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Instruction {
    pub fn roundabout_exit(&self) -> Option<String> {
        match self.roundabout_exit_number.as_ref()? {
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

impl RouteResponse {
    pub fn first_route(&self) -> Option<&Route> {
        self.routes.first()
    }

    pub fn summary(&self) -> Option<&RouteSummary> {
        self.first_route()?.summary.as_ref()
    }

    pub fn instructions(&self) -> &[Instruction] {
        self.first_route()
            .and_then(|route| route.guidance.as_ref())
            .map(|guidance| guidance.instructions.as_slice())
            .unwrap_or(&[])
    }

    /// Instruction points of the first route, in travel order.
    pub fn geometry(&self) -> Result<RouteGeometry, RouteError> {
        let guidance = self
            .first_route()
            .and_then(|route| route.guidance.as_ref())
            .ok_or(RouteError::NoGeometry)?;
        Ok(guidance
            .instructions
            .iter()
            .map(|instruction| Point::from(instruction.point))
            .collect())
    }
}

// === Annotation payloads ===

#[derive(Debug, Deserialize)]
struct WaqiFeed {
    data: WaqiData,
}

#[derive(Debug, Deserialize)]
struct WaqiData {
    aqi: f64,
    #[serde(default)]
    iaqi: HashMap<String, WaqiValue>,
}

#[derive(Debug, Deserialize)]
struct WaqiValue {
    v: f64,
}

/// Air-quality reading nearest to a sampled point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReading {
    pub aqi: i32,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

impl AirQualityReading {
    /// Decode a WAQI geo feed body.
    pub fn from_json(body: serde_json::Value) -> Result<Self, AnnotationError> {
        let feed: WaqiFeed = serde_json::from_value(body)
            .map_err(|err| AnnotationError::BadResponse(format!("air quality: {}", err)))?;
        let sub = |key: &str| feed.data.iaqi.get(key).map(|value| value.v);
        Ok(Self {
            aqi: feed.data.aqi.round() as i32,
            pm25: sub("pm25"),
            pm10: sub("pm10"),
            temperature: sub("t"),
            humidity: sub("h"),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenMeteoForecast {
    hourly: OpenMeteoHourly,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoHourly {
    temperature_2m: Vec<Option<f64>>,
    weathercode: Vec<Option<i32>>,
}

/// Current-hour weather at a sampled point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherSample {
    pub temperature_c: f64,
    pub weather_code: i32,
}

impl WeatherSample {
    /// Decode an Open-Meteo hourly forecast body, keeping the first hour only.
    pub fn from_json(body: serde_json::Value) -> Result<Self, AnnotationError> {
        let forecast: OpenMeteoForecast = serde_json::from_value(body)
            .map_err(|err| AnnotationError::BadResponse(format!("weather: {}", err)))?;
        let hourly = forecast.hourly;
        let temperature_c = hourly.temperature_2m.first().copied().flatten();
        let weather_code = hourly.weathercode.first().copied().flatten();
        match (temperature_c, weather_code) {
            (Some(temperature_c), Some(weather_code)) => Ok(Self {
                temperature_c,
                weather_code,
            }),
            _ => Err(AnnotationError::BadResponse(
                "weather: hourly series is empty".to_string(),
            )),
        }
    }
}

/// Route-level weather headline taken from the first surviving sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherHeadline {
    pub temperature_c: f64,
    pub weather_code: i32,
}

impl fmt::Display for WeatherHeadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description =
            crate::summary::weather_description(self.weather_code).unwrap_or("Unavailable");
        write!(f, "{}, {}°C", description, self.temperature_c)
    }
}

// === Traffic incidents ===

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IncidentPosition {
    pub x: f64,
    pub y: f64,
}

/// A TomTom incident-details POI. Field names follow the provider's short keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficIncident {
    pub id: String,
    pub p: IncidentPosition,
    #[serde(default)]
    pub ty: Option<i32>,
    /// Short title.
    #[serde(default)]
    pub t: Option<String>,
    /// Description.
    #[serde(default)]
    pub d: Option<String>,
    /// Road.
    #[serde(default)]
    pub r: Option<String>,
    /// From.
    #[serde(default)]
    pub f: Option<String>,
    /// Delay in seconds.
    #[serde(default)]
    pub dl: Option<f64>,
    /// Start date.
    #[serde(default)]
    pub sd: Option<String>,
    /// End date.
    #[serde(default)]
    pub ed: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    Roadworks,
    Incident,
    QueuingTraffic,
    Delay,
    Closed,
    Hazard,
    Unknown,
}

impl IncidentKind {
    pub fn label(self) -> &'static str {
        match self {
            IncidentKind::Roadworks => "Roadworks",
            IncidentKind::Incident => "Incident",
            IncidentKind::QueuingTraffic => "Queuing traffic",
            IncidentKind::Delay => "Delay",
            IncidentKind::Closed => "Road closed",
            IncidentKind::Hazard => "Hazard",
            IncidentKind::Unknown => "Unknown",
        }
    }
}

impl TrafficIncident {
    pub fn position(&self) -> Point {
        Point::new(self.p.y, self.p.x)
    }

    pub fn kind(&self) -> IncidentKind {
        match self.ty {
            Some(0) => IncidentKind::Roadworks,
            Some(1) => IncidentKind::Incident,
            Some(2) => IncidentKind::QueuingTraffic,
            Some(3) => IncidentKind::Delay,
            Some(4) => IncidentKind::Closed,
            Some(5) => IncidentKind::Hazard,
            _ => IncidentKind::Unknown,
        }
    }

    pub fn delay_minutes(&self) -> Option<i64> {
        self.dl
            .filter(|delay| *delay > 0.0)
            .map(|delay| (delay / 60.0).round() as i64)
    }

    pub fn start(&self) -> Option<DateTime<FixedOffset>> {
        self.sd
            .as_deref()
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
    }

    pub fn end(&self) -> Option<DateTime<FixedOffset>> {
        self.ed
            .as_deref()
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TrafficModel {
    #[serde(default)]
    poi: Vec<TrafficIncident>,
}

/// Response of `GET /traffic-incidents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrafficResponse {
    #[serde(default)]
    tm: Option<TrafficModel>,
}

impl TrafficResponse {
    pub fn into_incidents(self) -> Vec<TrafficIncident> {
        self.tm.map(|tm| tm.poi).unwrap_or_default()
    }
}

/// A geocoding suggestion for a free-text address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub point: Point,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn point_parses_lat_lng_pairs() {
        let point: Point = " 33.6846, -117.8265 ".parse().unwrap();
        assert_eq!(point, Point::new(33.6846, -117.8265));
        assert_eq!(point.to_string(), "33.6846,-117.8265");

        assert!("33.6846".parse::<Point>().is_err());
        assert!("north,south".parse::<Point>().is_err());
        assert!("NaN,1".parse::<Point>().is_err());
    }

    #[test]
    fn vehicle_type_accepts_only_known_modes() {
        assert_eq!("bicycle".parse::<VehicleType>(), Ok(VehicleType::Bicycle));
        let err = "boat".parse::<VehicleType>().unwrap_err();
        assert!(err.to_string().contains("car, truck, bicycle, pedestrian"));
    }

    #[test]
    fn geometry_follows_instruction_points() {
        let response: RouteResponse = serde_json::from_value(json!({
            "routes": [{
                "summary": {
                    "lengthInMeters": 12500,
                    "travelTimeInSeconds": 930,
                    "trafficDelayInSeconds": 0,
                    "departureTime": "2024-05-01T08:00:00+02:00",
                    "arrivalTime": "2024-05-01T08:15:30+02:00"
                },
                "guidance": {
                    "instructions": [
                        {"point": {"latitude": 52.5, "longitude": 13.4}, "maneuver": "DEPART"},
                        {"point": {"latitude": 52.51, "longitude": 13.41}, "maneuver": "TURN_LEFT", "street": "Unter den Linden"},
                        {"point": {"latitude": 52.52, "longitude": 13.42}, "maneuver": "ARRIVE", "roundaboutExitNumber": 2}
                    ]
                }
            }]
        }))
        .unwrap();

        let geometry = response.geometry().unwrap();
        assert_eq!(
            geometry.points(),
            &[
                Point::new(52.5, 13.4),
                Point::new(52.51, 13.41),
                Point::new(52.52, 13.42)
            ]
        );
        let summary = response.summary().unwrap();
        assert_eq!(summary.travel_minutes(), 16);
        assert_eq!(summary.delay_minutes(), None);
        assert_eq!(response.instructions()[2].roundabout_exit().as_deref(), Some("2"));
    }

    #[test]
    fn geometry_requires_guidance() {
        let response: RouteResponse =
            serde_json::from_value(json!({"routes": [{"summary": null}]})).unwrap();
        assert_eq!(response.geometry(), Err(RouteError::NoGeometry));

        let empty = RouteResponse::default();
        assert_eq!(empty.geometry(), Err(RouteError::NoGeometry));
    }

    #[test]
    fn air_quality_reading_decodes_waqi_feed() {
        let reading = AirQualityReading::from_json(json!({
            "status": "ok",
            "data": {
                "aqi": 57,
                "iaqi": {"pm25": {"v": 57}, "t": {"v": 18.5}, "h": {"v": 62}}
            }
        }))
        .unwrap();
        assert_eq!(reading.aqi, 57);
        assert_eq!(reading.pm25, Some(57.0));
        assert_eq!(reading.pm10, None);
        assert_eq!(reading.temperature, Some(18.5));
        assert_eq!(reading.humidity, Some(62.0));
    }

    #[test]
    fn air_quality_error_feed_is_bad_response() {
        let err = AirQualityReading::from_json(json!({
            "status": "error",
            "data": "Unknown station"
        }))
        .unwrap_err();
        assert!(matches!(err, AnnotationError::BadResponse(_)));
    }

    #[test]
    fn weather_sample_uses_first_hour() {
        let sample = WeatherSample::from_json(json!({
            "hourly": {
                "time": ["2024-05-01T00:00", "2024-05-01T01:00"],
                "temperature_2m": [11.2, 10.8],
                "weathercode": [3, 61]
            }
        }))
        .unwrap();
        assert_eq!(
            sample,
            WeatherSample {
                temperature_c: 11.2,
                weather_code: 3
            }
        );

        let empty = WeatherSample::from_json(json!({
            "hourly": {"temperature_2m": [], "weathercode": []}
        }));
        assert!(empty.is_err());
    }

    #[test]
    fn traffic_response_without_model_is_empty() {
        let response: TrafficResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.into_incidents().is_empty());

        let response: TrafficResponse = serde_json::from_value(json!({
            "tm": {"poi": [{
                "id": "inc-1",
                "p": {"x": 13.4, "y": 52.5},
                "ty": 4,
                "d": "Road closed",
                "dl": 600,
                "sd": "2024-05-01T06:00:00Z"
            }]}
        }))
        .unwrap();
        let incidents = response.into_incidents();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].position(), Point::new(52.5, 13.4));
        assert_eq!(incidents[0].kind(), IncidentKind::Closed);
        assert_eq!(incidents[0].delay_minutes(), Some(10));
        assert!(incidents[0].start().is_some());
        assert!(incidents[0].end().is_none());
    }
}
