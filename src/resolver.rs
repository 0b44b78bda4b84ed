//! Layered coordinate resolution
//!
//! Local gazetteer first (exact, then substring), the remote geocoder as a
//! fallback. The sentinel (0,0) with an empty country code is the internal
//! "place not recognized" signal consumed by the assembler.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::RouteError;
use crate::gazetteer::Gazetteer;
use crate::geocode::Geocoder;
use crate::models::SENTINEL_COORDINATES;

/// Country code assumed when neither the dataset nor the geocoder supplies one
const DEFAULT_COUNTRY_CODE: &str = "cn";

/// Resolves a single place name to coordinates and a country code
pub struct CoordinateResolver {
    gazetteer: Arc<Gazetteer>,
    geocoder: Arc<dyn Geocoder>,
}

impl CoordinateResolver {
    pub fn new(gazetteer: Arc<Gazetteer>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            gazetteer,
            geocoder,
        }
    }

    /// Resolve a place name to ((lon, lat), country code).
    ///
    /// Returns the sentinel when the geocoder answered but had nothing
    /// usable. Fails with `UpstreamUnavailable` only when the geocoding
    /// request itself could not be completed.
    pub async fn resolve(&self, name: &str) -> Result<([f64; 2], String), RouteError> {
        if let Some(entry) = self.gazetteer.lookup(name) {
            debug!("Gazetteer hit for '{}'", name);
            let country_code = entry
                .country_code
                .clone()
                .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string());
            return Ok((entry.coords, country_code));
        }

        // The raw name goes upstream untouched; normalization is a local
        // matching concern only
        match self.geocoder.search(name, 1).await {
            Ok(hits) => match hits.into_iter().next() {
                Some(hit) => {
                    let country_code = hit
                        .country_code
                        .map(|code| code.to_lowercase())
                        .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string());
                    debug!("Geocoder hit for '{}' ({})", name, country_code);
                    Ok((hit.coordinates, country_code))
                }
                None => {
                    debug!("No geocoding results for '{}'", name);
                    Ok((SENTINEL_COORDINATES, String::new()))
                }
            },
            Err(e) => {
                warn!("Geocoding request for '{}' failed: {}", name, e);
                Err(RouteError::upstream(format!("geocoding '{name}': {e}")))
            }
        }
    }
}
