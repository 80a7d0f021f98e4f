//! Plain-text rendering of a planned route.

use routescope_client::RouteRequest;
use routescope_core::{
    format_instruction, weather_description, AqiLevel, RouteState, SessionSnapshot,
};
use std::fmt::Write;

/// Render the route panel: summary, headline annotations, instructions,
/// per-sample annotations and incidents.
pub fn render_report(request: &RouteRequest, snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    // fmt::Write into a String cannot fail
    let _ = write_report(&mut out, request, snapshot);
    out
}

fn write_report(
    out: &mut String,
    request: &RouteRequest,
    snapshot: &SessionSnapshot,
) -> std::fmt::Result {
    let view = match &snapshot.state {
        RouteState::Ready(view) => view,
        RouteState::Error(message) => return writeln!(out, "Route failed: {}", message),
        other => return writeln!(out, "Route {}", other.name()),
    };
    let layers = &snapshot.layers;

    writeln!(
        out,
        "{} -> {} by {}",
        request.source.label, request.destination.label, request.vehicle
    )?;
    if let Some(summary) = view.summary() {
        writeln!(out, "  Distance:       {:.2} km", summary.distance_km())?;
        writeln!(out, "  Travel time:    {} min", summary.travel_minutes())?;
        match summary.delay_minutes() {
            Some(minutes) => writeln!(out, "  Traffic delay:  {} min", minutes)?,
            None => writeln!(out, "  Traffic delay:  none")?,
        }
        if let Some(departure) = summary.departure_time {
            writeln!(out, "  Departure:      {}", departure.format("%H:%M"))?;
        }
        if let Some(arrival) = summary.arrival_time {
            writeln!(out, "  Arrival:        {}", arrival.format("%H:%M"))?;
        }
    }
    match layers.headline_aqi.get() {
        Some(aqi) => writeln!(out, "  Air quality:    {} ({})", aqi, AqiLevel::from_aqi(*aqi))?,
        None => writeln!(out, "  Air quality:    {}", layers.headline_aqi)?,
    }
    writeln!(out, "  Weather:        {}", layers.headline_weather)?;

    let instructions = view.response.instructions();
    if !instructions.is_empty() {
        writeln!(out, "\nInstructions")?;
        for (i, instruction) in instructions.iter().enumerate() {
            write!(out, "  {:>3}. {}", i + 1, format_instruction(instruction))?;
            if let Some(exit) = instruction.roundabout_exit() {
                write!(out, " (exit {})", exit)?;
            }
            writeln!(out)?;
        }
    }

    if !layers.air_quality.is_empty() {
        writeln!(out, "\nAir quality along the route")?;
        for record in layers.air_quality.records() {
            writeln!(
                out,
                "  {:<24} AQI {:>3} {}",
                record.point.to_string(),
                record.payload.aqi,
                AqiLevel::from_aqi(record.payload.aqi)
            )?;
        }
    }

    if !layers.weather.is_empty() {
        writeln!(out, "\nWeather along the route")?;
        for record in layers.weather.records() {
            writeln!(
                out,
                "  {:<24} {:>5.1}°C {}",
                record.point.to_string(),
                record.payload.temperature_c,
                weather_description(record.payload.weather_code).unwrap_or("Unknown")
            )?;
        }
    }

    if !layers.incidents.is_empty() {
        writeln!(out, "\nTraffic incidents")?;
        for incident in &layers.incidents {
            write!(out, "  {:<16} {}", incident.kind().label(), incident.position())?;
            if let Some(description) = incident.d.as_deref() {
                write!(out, " {}", description)?;
            }
            if let Some(road) = incident.r.as_deref() {
                write!(out, " on {}", road)?;
            }
            if let Some(delay) = incident.delay_minutes() {
                write!(out, " (+{} min)", delay)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
