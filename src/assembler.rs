//! Route assembly
//!
//! Orchestrates intent extraction and coordinate resolution into a
//! validated route. All entry paths (explicit stops, free text, image)
//! share one validation policy: assembly aborts on the first stop that
//! resolves to the sentinel, naming the offending place.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::RouteError;
use crate::intent::IntentExtractor;
use crate::models::{ResolvedLocation, Route, Stop, near_sentinel};
use crate::ocr::TextRecognizer;
use crate::resolver::CoordinateResolver;

/// Pipeline facade: raw text, image bytes or explicit stops in, a geocoded
/// route or a typed failure out
pub struct RoutePlanner {
    extractor: IntentExtractor,
    resolver: CoordinateResolver,
    recognizer: Arc<dyn TextRecognizer>,
}

impl RoutePlanner {
    pub fn new(
        extractor: IntentExtractor,
        resolver: CoordinateResolver,
        recognizer: Arc<dyn TextRecognizer>,
    ) -> Self {
        Self {
            extractor,
            resolver,
            recognizer,
        }
    }

    /// Resolve explicit stops into a route, preserving input order.
    ///
    /// Stops are resolved sequentially to keep upstream load bounded.
    pub async fn resolve_route(&self, stops: &[Stop]) -> Result<Route, RouteError> {
        let mut resolved = Vec::with_capacity(stops.len());
        for stop in stops {
            let (coordinates, country_code) = self.resolver.resolve(&stop.name).await?;
            if near_sentinel(coordinates) {
                warn!("Aborting assembly, unrecognized stop '{}'", stop.name);
                return Err(RouteError::unrecognized(&stop.name));
            }
            resolved.push(ResolvedLocation {
                name: stop.name.clone(),
                coordinates,
                transport_mode: stop.transport_mode.clone(),
                country_code,
            });
        }
        Ok(Route { stops: resolved })
    }

    /// Extract an intent from free text, then resolve it
    pub async fn resolve_from_text(&self, text: &str) -> Result<Route, RouteError> {
        let intent = self.extractor.extract(text).await;
        info!("Resolving {} candidate stops", intent.locations.len());
        self.resolve_route(&intent.locations).await
    }

    /// Recognize text in an uploaded image, then run the text path.
    ///
    /// The chat capability is never invoked when recognition yields nothing
    /// usable; the request fails with `EmptyRecognizedText` first.
    pub async fn resolve_from_image(&self, image: &[u8]) -> Result<Route, RouteError> {
        let recognizer = Arc::clone(&self.recognizer);
        let bytes = image.to_vec();
        let text = tokio::task::spawn_blocking(move || recognizer.recognize(&bytes))
            .await
            .map_err(|e| RouteError::upstream(format!("OCR task failed: {e}")))?
            .unwrap_or_else(|e| {
                warn!("OCR failed, treating as empty text: {}", e);
                String::new()
            });

        if text.trim().is_empty() {
            return Err(RouteError::EmptyRecognizedText);
        }
        self.resolve_from_text(&text).await
    }

    /// Single-place lookup for the search endpoint. Sentinel results pass
    /// through unvalidated; the caller decides what "not found" means
    pub async fn resolve_place(&self, name: &str) -> Result<([f64; 2], String), RouteError> {
        self.resolver.resolve(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::{Gazetteer, GazetteerEntry};
    use crate::geocode::{GeocodeHit, Geocoder};
    use crate::llm::ChatModel;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingModel {
        reply: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ChatModel for CountingModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct EmptyGeocoder;

    #[async_trait]
    impl Geocoder for EmptyGeocoder {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<GeocodeHit>> {
            Ok(Vec::new())
        }
    }

    struct FixedRecognizer(&'static str);

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _image: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn gazetteer() -> Arc<Gazetteer> {
        Arc::new(Gazetteer::from_entries([
            (
                "beijing".to_string(),
                GazetteerEntry {
                    coords: [116.4074, 39.9042],
                    country_code: Some("cn".to_string()),
                },
            ),
            (
                "shanghai".to_string(),
                GazetteerEntry {
                    coords: [121.4737, 31.2304],
                    country_code: Some("cn".to_string()),
                },
            ),
        ]))
    }

    fn planner(reply: &str, recognized: &'static str) -> (RoutePlanner, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = Arc::new(CountingModel {
            reply: reply.to_string(),
            calls: Arc::clone(&calls),
        });
        let planner = RoutePlanner::new(
            IntentExtractor::new(model),
            CoordinateResolver::new(gazetteer(), Arc::new(EmptyGeocoder)),
            Arc::new(FixedRecognizer(recognized)),
        );
        (planner, calls)
    }

    #[tokio::test]
    async fn test_two_stop_route_preserves_order_and_names() {
        let (planner, _) = planner("{}", "");
        let stops = vec![Stop::new("Beijing"), Stop::new("Shanghai")];

        let route = planner.resolve_route(&stops).await.unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.stops[0].name, "Beijing");
        assert_eq!(route.stops[1].name, "Shanghai");
        assert_eq!(route.stops[0].coordinates, [116.4074, 39.9042]);
    }

    #[tokio::test]
    async fn test_unknown_stop_aborts_with_its_name() {
        let (planner, _) = planner("{}", "");
        let stops = vec![Stop::new("Beijing"), Stop::new("Atlantis"), Stop::new("Shanghai")];

        let err = planner.resolve_route(&stops).await.unwrap_err();
        match err {
            RouteError::PlaceNotRecognized { name } => assert_eq!(name, "Atlantis"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_text_path_applies_the_same_abort_policy() {
        let reply = r#"{"locations": [{"name": "Beijing", "transport_mode": "flight"}, {"name": "Atlantis", "transport_mode": "flight"}]}"#;
        let (planner, _) = planner(reply, "");

        let err = planner.resolve_from_text("Beijing then Atlantis").await.unwrap_err();
        assert!(matches!(err, RouteError::PlaceNotRecognized { .. }));
    }

    #[tokio::test]
    async fn test_text_path_is_idempotent() {
        let reply = r#"{"locations": [{"name": "Beijing", "transport_mode": "flight"}, {"name": "Shanghai", "transport_mode": "train"}]}"#;
        let (planner, _) = planner(reply, "");

        let first = planner.resolve_from_text("Beijing to Shanghai").await.unwrap();
        let second = planner.resolve_from_text("Beijing to Shanghai").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_ocr_never_reaches_the_model() {
        let (planner, calls) = planner("{}", "   \n  ");

        let err = planner.resolve_from_image(b"image bytes").await.unwrap_err();
        assert!(matches!(err, RouteError::EmptyRecognizedText));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_image_path_feeds_recognized_text_to_the_model() {
        let reply = r#"{"locations": [{"name": "Shanghai", "transport_mode": "flight"}]}"#;
        let (planner, calls) = planner(reply, "Shanghai itinerary");

        let route = planner.resolve_from_image(b"image bytes").await.unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route.stops[0].name, "Shanghai");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_stop_list_is_an_empty_route() {
        let (planner, _) = planner("{}", "");
        let route = planner.resolve_route(&[]).await.unwrap();
        assert!(route.is_empty());
    }
}
