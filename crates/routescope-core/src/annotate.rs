//! Fan-out annotation lookups along a route and fold the results.
//!
//! One lookup is issued per sampled point, all concurrently, and joined by a
//! single barrier. Failed lookups are logged and dropped; the surviving
//! payloads stay paired with the point they were requested for.

use crate::error::AnnotationError;
use crate::models::{AirQualityReading, Point, RouteGeometry, WeatherHeadline, WeatherSample};
use crate::sampling::{sample, AIR_QUALITY_SAMPLES, WEATHER_SAMPLES};
use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    AirQuality,
    Weather,
}

impl AnnotationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationKind::AirQuality => "air_quality",
            AnnotationKind::Weather => "weather",
        }
    }

    /// Number of route samples looked up for this layer.
    pub fn sample_count(self) -> usize {
        match self {
            AnnotationKind::AirQuality => AIR_QUALITY_SAMPLES,
            AnnotationKind::Weather => WEATHER_SAMPLES,
        }
    }
}

/// A payload that can contribute a route-level headline value.
pub trait Annotation {
    type Summary: Clone + fmt::Debug + PartialEq;

    fn summary(&self) -> Self::Summary;
}

impl Annotation for AirQualityReading {
    type Summary = i32;

    fn summary(&self) -> i32 {
        self.aqi
    }
}

impl Annotation for WeatherSample {
    type Summary = WeatherHeadline;

    fn summary(&self) -> WeatherHeadline {
        WeatherHeadline {
            temperature_c: self.temperature_c,
            weather_code: self.weather_code,
        }
    }
}

/// Source of per-point annotation data.
pub trait AnnotationProvider: Send + Sync {
    type Payload: Send;

    fn kind(&self) -> AnnotationKind;

    fn lookup(
        &self,
        point: Point,
    ) -> impl Future<Output = Result<Self::Payload, AnnotationError>> + Send;
}

/// Look up every point of `plan` concurrently.
///
/// The output is positional: entry `i` belongs to `plan[i]` whatever order
/// the lookups complete in. Failures become `None`; nothing is retried.
pub async fn fetch_all<P: AnnotationProvider>(
    provider: &P,
    plan: &[Point],
) -> Vec<Option<P::Payload>> {
    let kind = provider.kind();
    let lookups = plan.iter().map(|point| async move {
        match provider.lookup(*point).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::warn!(
                    layer = kind.as_str(),
                    lat = point.lat,
                    lon = point.lon,
                    "Annotation lookup failed: {}",
                    err
                );
                None
            }
        }
    });
    join_all(lookups).await
}

/// A successful lookup paired with the point it was requested for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationRecord<P> {
    pub point: Point,
    pub payload: P,
}

/// Annotations of one kind for one route, plus the headline value.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnnotationSet<P: Annotation> {
    records: Vec<AnnotationRecord<P>>,
    summary: Option<P::Summary>,
}

impl<P: Annotation> Default for RouteAnnotationSet<P> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            summary: None,
        }
    }
}

impl<P: Annotation> RouteAnnotationSet<P> {
    pub fn records(&self) -> &[AnnotationRecord<P>] {
        &self.records
    }

    /// Headline taken from the first surviving record, in plan order.
    pub fn summary(&self) -> Option<&P::Summary> {
        self.summary.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Drop failed lookups and pair each survivor with its plan point.
pub fn aggregate<P: Annotation>(plan: &[Point], raw: Vec<Option<P>>) -> RouteAnnotationSet<P> {
    let records: Vec<AnnotationRecord<P>> = plan
        .iter()
        .zip(raw)
        .filter_map(|(point, payload)| {
            payload.map(|payload| AnnotationRecord {
                point: *point,
                payload,
            })
        })
        .collect();
    let summary = records.first().map(|record| record.payload.summary());
    RouteAnnotationSet { records, summary }
}

/// Sample, fetch and aggregate one annotation layer for a route.
pub async fn annotate_route<P>(
    provider: &P,
    geometry: &RouteGeometry,
    count: usize,
) -> RouteAnnotationSet<P::Payload>
where
    P: AnnotationProvider,
    P::Payload: Annotation,
{
    let plan = sample(geometry.points(), count);
    let raw = fetch_all(provider, &plan).await;
    let set = aggregate(&plan, raw);
    tracing::debug!(
        layer = provider.kind().as_str(),
        "{} of {} annotation lookups succeeded",
        set.len(),
        plan.len()
    );
    set
}

/// Output slot for a headline value shown next to the route summary.
///
/// Starts out unavailable and is only overwritten by a set that actually
/// produced a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySlot<T> {
    value: Option<T>,
}

impl<T> Default for SummarySlot<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T: Clone> SummarySlot<T> {
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Returns whether the slot was updated.
    pub fn publish<P>(&mut self, set: &RouteAnnotationSet<P>) -> bool
    where
        P: Annotation<Summary = T>,
    {
        match set.summary() {
            Some(summary) => {
                self.value = Some(summary.clone());
                true
            }
            None => false,
        }
    }
}

impl<T: fmt::Display> fmt::Display for SummarySlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => value.fmt(f),
            None => f.write_str("Unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Reading(i32);

    impl Annotation for Reading {
        type Summary = i32;

        fn summary(&self) -> i32 {
            self.0
        }
    }

    /// Answers with the point's latitude; earlier points answer last.
    struct StubProvider {
        failing: HashSet<i64>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(failing: &[i64]) -> Self {
            Self {
                failing: failing.iter().copied().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AnnotationProvider for StubProvider {
        type Payload = Reading;

        fn kind(&self) -> AnnotationKind {
            AnnotationKind::AirQuality
        }

        async fn lookup(&self, point: Point) -> Result<Reading, AnnotationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = point.lat as i64;
            tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(key as u64 * 5))).await;
            if self.failing.contains(&key) {
                return Err(AnnotationError::NetworkFailure("connection refused".to_string()));
            }
            Ok(Reading(key as i32))
        }
    }

    fn plan(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
    }

    #[tokio::test]
    async fn fetch_all_keeps_plan_order_and_absorbs_failures() {
        let provider = StubProvider::new(&[1, 3]);
        let raw = fetch_all(&provider, &plan(5)).await;
        assert_eq!(
            raw,
            vec![Some(Reading(0)), None, Some(Reading(2)), None, Some(Reading(4))]
        );
    }

    #[tokio::test]
    async fn duplicate_plan_points_are_fetched_twice() {
        let provider = StubProvider::new(&[]);
        let points = vec![Point::new(0.0, 0.0); 5];
        let raw = fetch_all(&provider, &points).await;
        assert_eq!(raw.len(), 5);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn aggregate_of_all_failures_is_empty_and_leaves_slot_alone() {
        let points = plan(4);
        let set: RouteAnnotationSet<Reading> = aggregate(&points, vec![None, None, None, None]);
        assert!(set.is_empty());
        assert_eq!(set.summary(), None);

        let mut slot = SummarySlot::default();
        slot.publish(&aggregate(&points, vec![Some(Reading(42)), None, None, None]));
        assert!(!slot.publish(&set));
        assert_eq!(slot.get(), Some(&42));
    }

    #[test]
    fn aggregate_pairs_survivors_with_their_own_points() {
        let points = plan(4);
        let set = aggregate(&points, vec![None, Some(Reading(10)), None, Some(Reading(30))]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0].point, points[1]);
        assert_eq!(set.records()[0].payload, Reading(10));
        assert_eq!(set.records()[1].point, points[3]);
        assert_eq!(set.records()[1].payload, Reading(30));
        assert_eq!(set.summary(), Some(&10));
    }

    #[test]
    fn empty_slot_renders_unavailable() {
        let mut slot: SummarySlot<i32> = SummarySlot::default();
        assert_eq!(slot.to_string(), "Unavailable");
        slot.publish(&aggregate(&plan(1), vec![Some(Reading(87))]));
        assert_eq!(slot.to_string(), "87");
    }

    #[tokio::test]
    async fn annotate_route_samples_before_fetching() {
        let provider = StubProvider::new(&[4]);
        let geometry: RouteGeometry = plan(9).into();
        let set = annotate_route(&provider, &geometry, 5).await;

        // segments = 8, step = 2: indices 0, 2, 4, 6, 8; index 4 fails
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
        let lats: Vec<f64> = set.records().iter().map(|r| r.point.lat).collect();
        assert_eq!(lats, vec![0.0, 2.0, 6.0, 8.0]);
        assert_eq!(set.summary(), Some(&0));
    }

    #[tokio::test]
    async fn annotate_route_skips_single_point_routes() {
        let provider = StubProvider::new(&[]);
        let geometry: RouteGeometry = plan(1).into();
        let set = annotate_route(&provider, &geometry, AnnotationKind::Weather.sample_count()).await;
        assert!(set.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
