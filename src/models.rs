//! Core data model for stops, intents and assembled routes

use serde::{Deserialize, Serialize};

/// Coordinates reported by the resolver when a place is not recognized
pub const SENTINEL_COORDINATES: [f64; 2] = [0.0, 0.0];

/// Transport mode assumed when the model or caller does not provide one
pub const DEFAULT_TRANSPORT_MODE: &str = "flight";

fn default_transport_mode() -> String {
    DEFAULT_TRANSPORT_MODE.to_string()
}

/// A single requested stop, before coordinate resolution
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Stop {
    /// Free-text place name as entered or extracted
    pub name: String,
    /// Transport mode towards this stop. An open set ("flight", "train",
    /// "car", "walk", ...), so a string rather than a closed enum
    #[serde(default = "default_transport_mode")]
    pub transport_mode: String,
}

impl Stop {
    /// Create a stop with the default transport mode
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport_mode: default_transport_mode(),
        }
    }

    /// Create a stop with an explicit transport mode
    #[must_use]
    pub fn with_mode(name: impl Into<String>, transport_mode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport_mode: transport_mode.into(),
        }
    }
}

/// Ordered list of candidate stops decoded from a model response.
///
/// Transient: discarded once the route is assembled.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Intent {
    #[serde(default)]
    pub locations: Vec<Stop>,
}

/// A stop resolved to coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    /// Original input name, not normalized
    pub name: String,
    /// (lon, lat) in decimal degrees
    pub coordinates: [f64; 2],
    pub transport_mode: String,
    /// ISO 3166-1 alpha-2, lowercase. May be empty
    pub country_code: String,
}

/// An ordered travel route.
///
/// Order is the travel sequence and is never changed by the pipeline.
/// Serializes as a plain array of locations.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Route {
    pub stops: Vec<ResolvedLocation>,
}

impl Route {
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// True when coordinates signal "not recognized": within 0.1 degrees of the
/// sentinel on both axes
#[must_use]
pub fn near_sentinel(coordinates: [f64; 2]) -> bool {
    coordinates[0].abs() < 0.1 && coordinates[1].abs() < 0.1
}
