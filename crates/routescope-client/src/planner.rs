//! Drives one route request end to end over a shared [`RouteSession`].

use crate::backend::{AirQualityProvider, BackendClient};
use crate::config::ClientConfig;
use crate::speech::SpeechSink;
use crate::summary::SummaryClient;
use crate::weather::OpenMeteoClient;
use routescope_core::{
    annotate_route, build_prompt, traffic_bounding_box, AnnotationKind, Generation, LayerToggles,
    Outcome, Point, RouteSession, RouteView, SessionSnapshot, TripFacts, VehicleType,
};
use std::sync::Arc;

/// A resolved route endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub label: String,
    pub point: Point,
}

impl Place {
    pub fn new(label: impl Into<String>, point: Point) -> Self {
        Self {
            label: label.into(),
            point,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub source: Place,
    pub destination: Place,
    pub vehicle: VehicleType,
    pub layers: LayerToggles,
    pub summary: bool,
}

pub struct RoutePlanner {
    backend: BackendClient,
    air_quality: AirQualityProvider,
    weather: OpenMeteoClient,
    summary: Option<SummaryClient>,
    speech: Arc<dyn SpeechSink>,
    session: Arc<RouteSession>,
}

impl RoutePlanner {
    pub fn new(
        backend: BackendClient,
        weather: OpenMeteoClient,
        summary: Option<SummaryClient>,
        speech: Arc<dyn SpeechSink>,
        session: Arc<RouteSession>,
    ) -> Self {
        Self {
            air_quality: AirQualityProvider::new(backend.clone()),
            backend,
            weather,
            summary,
            speech,
            session,
        }
    }

    pub fn from_config(config: &ClientConfig, speech: Arc<dyn SpeechSink>) -> Self {
        let timeout = config.http_timeout();
        let summary = config.summary_enabled().then(|| {
            SummaryClient::new(&config.summary_url, &config.summary_api_key, timeout)
        });
        Self::new(
            BackendClient::new(&config.backend_url, timeout),
            OpenMeteoClient::new(&config.weather_url, timeout),
            summary,
            speech,
            Arc::new(RouteSession::new()),
        )
    }

    pub fn session(&self) -> &Arc<RouteSession> {
        &self.session
    }

    /// Fetch the route, annotate it and, if asked, speak a summary.
    ///
    /// Route failures end in the session's error state; annotation failures
    /// only leave their layer empty.
    pub async fn plan(&self, request: &RouteRequest) -> SessionSnapshot {
        let generation = self.session.begin_request();
        tracing::info!(
            "Requesting {} route {} -> {} ({})",
            request.vehicle,
            request.source.label,
            request.destination.label,
            generation
        );

        let result = self
            .backend
            .route(request.source.point, request.destination.point, request.vehicle)
            .await;
        if self.session.complete(generation, result) == Outcome::Stale {
            return self.session.snapshot();
        }
        let Some(view) = self.session.route() else {
            return self.session.snapshot();
        };

        self.annotate(generation, request, &view).await;

        if request.summary {
            self.speak_summary(generation, request, &view).await;
        }
        self.session.snapshot()
    }

    async fn annotate(&self, generation: Generation, request: &RouteRequest, view: &RouteView) {
        let layers = request.layers;

        let air_quality = async {
            if layers.air_quality {
                let set = annotate_route(
                    &self.air_quality,
                    &view.geometry,
                    AnnotationKind::AirQuality.sample_count(),
                )
                .await;
                self.session.publish_air_quality(generation, set);
            }
        };

        let weather = async {
            if layers.weather {
                let set = annotate_route(
                    &self.weather,
                    &view.geometry,
                    AnnotationKind::Weather.sample_count(),
                )
                .await;
                self.session.publish_weather(generation, set);
            }
        };

        let traffic = async {
            if layers.traffic {
                let bbox = traffic_bounding_box(request.source.point, request.destination.point);
                match self.backend.traffic_incidents(&bbox).await {
                    Ok(incidents) => {
                        tracing::debug!("Found {} traffic incidents", incidents.len());
                        self.session.publish_incidents(generation, incidents);
                    }
                    Err(e) => tracing::warn!("Error fetching traffic incidents: {}", e),
                }
            }
        };

        tokio::join!(air_quality, weather, traffic);
    }

    async fn speak_summary(&self, generation: Generation, request: &RouteRequest, view: &RouteView) {
        let Some(client) = self.summary.as_ref() else {
            tracing::debug!("Summary generation not configured");
            return;
        };
        let Some(route_summary) = view.summary() else {
            return;
        };
        if !self.session.mark_summary_requested(generation) {
            return;
        }

        let layers = self.session.snapshot().layers;
        let facts = TripFacts::new(
            request.source.label.as_str(),
            request.destination.label.as_str(),
            request.vehicle,
            route_summary,
            view.response.instructions(),
            &layers,
        );

        let text = match client.generate(&build_prompt(&facts)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Error fetching summary: {:#}", e);
                return;
            }
        };

        if self.session.set_summary_text(generation, text.clone()) == Outcome::Applied {
            if let Err(e) = self.speech.speak(&text) {
                tracing::warn!("Speech output failed: {}", e);
            }
        }
    }
}
