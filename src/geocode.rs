//! Remote geocoding capability and the Photon-backed client
//!
//! Forward geocoding only: free-form query in, candidates ordered by
//! relevance out. An empty candidate list is a legal "nothing found"
//! outcome; an `Err` means the request itself could not be completed.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::GeocodingConfig;

/// One candidate returned by a geocoding service
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    /// (lon, lat) in decimal degrees
    pub coordinates: [f64; 2],
    /// ISO 3166-1 alpha-2 as reported by the service, any case
    pub country_code: Option<String>,
}

/// Narrow forward-geocoding capability consumed by the resolver
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Free-form lookup, best candidates first, at most `limit` of them
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>>;
}

/// GeoJSON-shaped response of the Photon API
#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: PhotonGeometry,
    #[serde(default)]
    properties: PhotonProperties,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    countrycode: Option<String>,
}

/// Client for a Photon-compatible geocoding endpoint
pub struct PhotonClient {
    client: Client,
    base_url: String,
}

impl PhotonClient {
    /// Create a new client with the configured timeout
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("tripflow/0.1.0")
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for PhotonClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>> {
        let url = format!(
            "{}?q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );

        debug!("Geocoding '{}' (limit {})", query, limit);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Geocoding request for '{query}' failed"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Geocoding endpoint returned {status}");
        }

        // An undecodable body counts as "nothing found", not an outage
        let decoded: PhotonResponse = match response.json().await {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Failed to decode geocoding response for '{}': {}", query, e);
                return Ok(Vec::new());
            }
        };

        Ok(decoded
            .features
            .into_iter()
            .map(|feature| GeocodeHit {
                coordinates: feature.geometry.coordinates,
                country_code: feature.properties.countrycode,
            })
            .collect())
    }
}
