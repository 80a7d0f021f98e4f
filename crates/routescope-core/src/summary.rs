//! Human-readable trip facts and the prompt for the spoken summary.

use crate::models::{Instruction, Point, RouteSummary, VehicleType};
use crate::session::AnnotationLayers;
use std::fmt;

/// WMO weather interpretation codes as reported by Open-Meteo.
pub fn weather_description(code: i32) -> Option<&'static str> {
    let description = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Slight thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Violent thunderstorm with hail",
        _ => return None,
    };
    Some(description)
}

/// US EPA air quality index bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub fn from_aqi(aqi: i32) -> Self {
        match aqi {
            i32::MIN..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitiveGroups,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `"turn left onto Main St (1.2 km)"`
pub fn format_instruction(instruction: &Instruction) -> String {
    let mut text = instruction
        .maneuver
        .as_deref()
        .map(|maneuver| maneuver.replace('_', " ").to_lowercase())
        .unwrap_or_else(|| "continue".to_string());
    if let Some(street) = instruction.street.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(" onto ");
        text.push_str(street);
    }
    if let Some(offset) = instruction.route_offset_in_meters.filter(|m| *m > 0.0) {
        text.push_str(&format!(" ({:.1} km)", offset / 1000.0));
    }
    text
}

/// Search area for traffic incidents between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Renders `south,west,north,east`, the order the incident API expects.
impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

/// Padding around the endpoints, roughly 11 km.
const BOUNDING_BOX_PADDING_DEG: f64 = 0.1;

pub fn traffic_bounding_box(source: Point, destination: Point) -> BoundingBox {
    BoundingBox {
        south: source.lat.min(destination.lat) - BOUNDING_BOX_PADDING_DEG,
        west: source.lon.min(destination.lon) - BOUNDING_BOX_PADDING_DEG,
        north: source.lat.max(destination.lat) + BOUNDING_BOX_PADDING_DEG,
        east: source.lon.max(destination.lon) + BOUNDING_BOX_PADDING_DEG,
    }
}

/// Facts about a planned trip, rendered for the summary prompt.
#[derive(Debug, Clone)]
pub struct TripFacts {
    pub source: String,
    pub destination: String,
    pub vehicle: VehicleType,
    pub distance_km: f64,
    pub travel_minutes: i64,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub delay_minutes: Option<i64>,
    pub instructions: Vec<String>,
    pub air_quality: String,
    pub weather: String,
    pub temperature: String,
}

impl TripFacts {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        vehicle: VehicleType,
        summary: &RouteSummary,
        instructions: &[Instruction],
        layers: &AnnotationLayers,
    ) -> Self {
        let headline = layers.headline_weather.get();
        Self {
            source: source.into(),
            destination: destination.into(),
            vehicle,
            distance_km: summary.distance_km(),
            travel_minutes: summary.travel_minutes(),
            departure: summary.departure_time.map(|t| t.format("%H:%M").to_string()),
            arrival: summary.arrival_time.map(|t| t.format("%H:%M").to_string()),
            delay_minutes: summary.delay_minutes(),
            instructions: instructions.iter().map(format_instruction).collect(),
            air_quality: layers.headline_aqi.to_string(),
            weather: headline
                .and_then(|h| weather_description(h.weather_code))
                .unwrap_or("Unavailable")
                .to_string(),
            temperature: headline
                .map(|h| format!("{}°C", h.temperature_c))
                .unwrap_or_else(|| "Unavailable".to_string()),
        }
    }
}

/// Prompt asking the text generator for a short, spoken-style trip summary.
pub fn build_prompt(facts: &TripFacts) -> String {
    let delay = match facts.delay_minutes {
        Some(minutes) => format!("{} minutes", minutes),
        None => "No delay".to_string(),
    };
    format!(
        "You are my route assistant. I am travelling from {source} to {destination} by {vehicle}. \
         Using only the trip details below, give me a short summary of the journey. \
         Do not add anything beyond the summary.\n\
         Total Distance: {distance:.2} km\n\
         Estimated Travel Time: {minutes} minutes\n\
         Departure Time: {departure}\n\
         Arrival Time: {arrival}\n\
         Traffic Delay: {delay}\n\
         Instructions: {instructions}\n\
         Air Quality: {air_quality}\n\
         Weather: {weather}\n\
         Temperature: {temperature}\n\
         Write it in a natural, human speaking tone.",
        source = facts.source,
        destination = facts.destination,
        vehicle = facts.vehicle,
        distance = facts.distance_km,
        minutes = facts.travel_minutes,
        departure = facts.departure.as_deref().unwrap_or("Unavailable"),
        arrival = facts.arrival.as_deref().unwrap_or("Unavailable"),
        delay = delay,
        instructions = facts.instructions.join(", "),
        air_quality = facts.air_quality,
        weather = facts.weather,
        temperature = facts.temperature,
    )
}
