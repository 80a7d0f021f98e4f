//! Route request sequencing.
//!
//! Every route request gets a fresh [`Generation`]. Results from async work
//! are written back together with the generation they were started under and
//! are discarded once a newer request has begun, so a slow response for an
//! old route can never overwrite the current one.

use crate::annotate::{RouteAnnotationSet, SummarySlot};
use crate::error::RouteError;
use crate::models::{
    AirQualityReading, RouteGeometry, RouteResponse, RouteSummary, TrafficIncident,
    WeatherHeadline, WeatherSample,
};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Identifier of one route request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A route that was fetched successfully.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub response: RouteResponse,
    pub geometry: RouteGeometry,
}

impl RouteView {
    pub fn summary(&self) -> Option<&RouteSummary> {
        self.response.summary()
    }
}

#[derive(Debug, Clone, Default)]
pub enum RouteState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<RouteView>),
    Error(String),
}

impl RouteState {
    pub fn name(&self) -> &'static str {
        match self {
            RouteState::Idle => "idle",
            RouteState::Loading => "loading",
            RouteState::Ready(_) => "ready",
            RouteState::Error(_) => "error",
        }
    }
}

/// Which annotation layers run for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerToggles {
    pub traffic: bool,
    pub air_quality: bool,
    pub weather: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            traffic: true,
            air_quality: true,
            weather: true,
        }
    }
}

/// Everything attached to the current route. Replaced wholesale per request.
#[derive(Debug, Clone, Default)]
pub struct AnnotationLayers {
    pub air_quality: RouteAnnotationSet<AirQualityReading>,
    pub weather: RouteAnnotationSet<WeatherSample>,
    pub incidents: Vec<TrafficIncident>,
    pub headline_aqi: SummarySlot<i32>,
    pub headline_weather: SummarySlot<WeatherHeadline>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The write belonged to a superseded request and was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub generation: Generation,
    pub state: RouteState,
    pub layers: AnnotationLayers,
    pub summary_text: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    generation: u64,
    state: RouteState,
    layers: AnnotationLayers,
    summary_requested: bool,
    summary_text: Option<String>,
}

impl Inner {
    fn accepts(&self, generation: Generation) -> bool {
        self.generation == generation.0 && matches!(self.state, RouteState::Ready(_))
    }
}

/// Shared state of the route view: Idle → Loading → Ready | Error.
#[derive(Debug, Default)]
pub struct RouteSession {
    inner: Mutex<Inner>,
}

impl RouteSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_generation(&self) -> Generation {
        Generation(self.lock().generation)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.lock().generation == generation.0
    }

    /// Start a new request, superseding whatever was in flight.
    pub fn begin_request(&self) -> Generation {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = RouteState::Loading;
        inner.layers = AnnotationLayers::default();
        inner.summary_requested = false;
        inner.summary_text = None;
        tracing::debug!("Route request {} started", Generation(inner.generation));
        Generation(inner.generation)
    }

    /// Record the result of the route fetch started under `generation`.
    pub fn complete(
        &self,
        generation: Generation,
        result: Result<RouteResponse, RouteError>,
    ) -> Outcome {
        let mut inner = self.lock();
        if inner.generation != generation.0 || !matches!(inner.state, RouteState::Loading) {
            tracing::debug!("Dropping stale route response for {}", generation);
            return Outcome::Stale;
        }

        let result = result.and_then(|response| {
            let geometry = response.geometry()?;
            Ok(RouteView { response, geometry })
        });
        inner.state = match result {
            Ok(view) => {
                tracing::info!(
                    "Route {} ready with {} points",
                    generation,
                    view.geometry.len()
                );
                RouteState::Ready(Arc::new(view))
            }
            Err(err) => {
                tracing::error!("Route {} failed: {}", generation, err);
                RouteState::Error(err.to_string())
            }
        };
        Outcome::Applied
    }

    /// The route of the current request, if it is ready.
    pub fn route(&self) -> Option<Arc<RouteView>> {
        match &self.lock().state {
            RouteState::Ready(view) => Some(view.clone()),
            _ => None,
        }
    }

    pub fn publish_air_quality(
        &self,
        generation: Generation,
        set: RouteAnnotationSet<AirQualityReading>,
    ) -> Outcome {
        let mut inner = self.lock();
        if !inner.accepts(generation) {
            return stale(generation, "air quality");
        }
        inner.layers.headline_aqi.publish(&set);
        inner.layers.air_quality = set;
        Outcome::Applied
    }

    pub fn publish_weather(
        &self,
        generation: Generation,
        set: RouteAnnotationSet<WeatherSample>,
    ) -> Outcome {
        let mut inner = self.lock();
        if !inner.accepts(generation) {
            return stale(generation, "weather");
        }
        inner.layers.headline_weather.publish(&set);
        inner.layers.weather = set;
        Outcome::Applied
    }

    pub fn publish_incidents(
        &self,
        generation: Generation,
        incidents: Vec<TrafficIncident>,
    ) -> Outcome {
        let mut inner = self.lock();
        if !inner.accepts(generation) {
            return stale(generation, "traffic");
        }
        inner.layers.incidents = incidents;
        Outcome::Applied
    }

    /// Claim the trip summary for `generation`. Only the first claim succeeds.
    pub fn mark_summary_requested(&self, generation: Generation) -> bool {
        let mut inner = self.lock();
        if !inner.accepts(generation) || inner.summary_requested {
            return false;
        }
        inner.summary_requested = true;
        true
    }

    pub fn set_summary_text(&self, generation: Generation, text: String) -> Outcome {
        let mut inner = self.lock();
        if !inner.accepts(generation) {
            return stale(generation, "summary");
        }
        inner.summary_text = Some(text);
        Outcome::Applied
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            generation: Generation(inner.generation),
            state: inner.state.clone(),
            layers: inner.layers.clone(),
            summary_text: inner.summary_text.clone(),
        }
    }
}

fn stale(generation: Generation, layer: &str) -> Outcome {
    tracing::debug!("Dropping stale {} result for {}", layer, generation);
    Outcome::Stale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::aggregate;
    use crate::models::Point;
    use serde_json::json;

    fn route_response(points: &[(f64, f64)]) -> RouteResponse {
        let instructions: Vec<_> = points
            .iter()
            .map(|(lat, lon)| json!({"point": {"latitude": lat, "longitude": lon}}))
            .collect();
        serde_json::from_value(json!({
            "routes": [{
                "summary": {"lengthInMeters": 1000, "travelTimeInSeconds": 120},
                "guidance": {"instructions": instructions}
            }]
        }))
        .unwrap()
    }

    fn air_quality(aqi: i32) -> RouteAnnotationSet<AirQualityReading> {
        let reading = AirQualityReading {
            aqi,
            pm25: None,
            pm10: None,
            temperature: None,
            humidity: None,
        };
        aggregate(&[Point::new(0.0, 0.0)], vec![Some(reading)])
    }

    #[test]
    fn request_moves_through_loading_to_ready() {
        let session = RouteSession::new();
        assert!(matches!(session.snapshot().state, RouteState::Idle));

        let generation = session.begin_request();
        assert!(matches!(session.snapshot().state, RouteState::Loading));

        let outcome = session.complete(generation, Ok(route_response(&[(0.0, 0.0), (1.0, 1.0)])));
        assert_eq!(outcome, Outcome::Applied);
        let view = session.route().expect("route ready");
        assert_eq!(view.geometry.len(), 2);
    }

    #[test]
    fn failed_request_clears_previous_route() {
        let session = RouteSession::new();
        let first = session.begin_request();
        session.complete(first, Ok(route_response(&[(0.0, 0.0), (1.0, 1.0)])));
        session.publish_air_quality(first, air_quality(40));

        let second = session.begin_request();
        session.complete(second, Err(RouteError::bad_response(Some(500), "boom")));

        let snapshot = session.snapshot();
        match snapshot.state {
            RouteState::Error(message) => assert!(message.contains("500")),
            other => panic!("expected error state, got {}", other.name()),
        }
        assert!(session.route().is_none());
        assert!(snapshot.layers.air_quality.is_empty());
        assert_eq!(snapshot.layers.headline_aqi.get(), None);
    }

    #[test]
    fn response_without_guidance_is_an_error() {
        let session = RouteSession::new();
        let generation = session.begin_request();
        session.complete(generation, Ok(RouteResponse::default()));
        assert!(matches!(session.snapshot().state, RouteState::Error(_)));
    }

    #[test]
    fn stale_route_response_is_discarded() {
        let session = RouteSession::new();
        let old = session.begin_request();
        let new = session.begin_request();
        assert!(new > old);

        assert_eq!(
            session.complete(old, Ok(route_response(&[(5.0, 5.0), (6.0, 6.0)]))),
            Outcome::Stale
        );
        assert!(matches!(session.snapshot().state, RouteState::Loading));

        session.complete(new, Ok(route_response(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])));
        assert_eq!(session.route().unwrap().geometry.len(), 3);
    }

    #[test]
    fn stale_annotations_do_not_merge_into_new_route() {
        let session = RouteSession::new();
        let old = session.begin_request();
        session.complete(old, Ok(route_response(&[(0.0, 0.0), (1.0, 1.0)])));

        let new = session.begin_request();
        session.complete(new, Ok(route_response(&[(2.0, 2.0), (3.0, 3.0)])));

        assert_eq!(session.publish_air_quality(old, air_quality(180)), Outcome::Stale);
        assert_eq!(session.publish_incidents(old, Vec::new()), Outcome::Stale);
        assert_eq!(session.snapshot().layers.headline_aqi.get(), None);

        assert_eq!(session.publish_air_quality(new, air_quality(35)), Outcome::Applied);
        assert_eq!(session.snapshot().layers.headline_aqi.get(), Some(&35));
    }

    #[test]
    fn annotations_wait_for_ready_state() {
        let session = RouteSession::new();
        let generation = session.begin_request();
        assert_eq!(session.publish_air_quality(generation, air_quality(20)), Outcome::Stale);
    }

    #[test]
    fn summary_is_requested_once_per_generation() {
        let session = RouteSession::new();
        let first = session.begin_request();
        session.complete(first, Ok(route_response(&[(0.0, 0.0), (1.0, 1.0)])));
        assert!(session.mark_summary_requested(first));
        assert!(!session.mark_summary_requested(first));

        let second = session.begin_request();
        session.complete(second, Ok(route_response(&[(0.0, 0.0), (1.0, 1.0)])));
        assert!(!session.mark_summary_requested(first));
        assert!(session.mark_summary_requested(second));

        assert_eq!(session.set_summary_text(first, "old".to_string()), Outcome::Stale);
        assert_eq!(session.set_summary_text(second, "new".to_string()), Outcome::Applied);
        assert_eq!(session.snapshot().summary_text.as_deref(), Some("new"));
    }
}
