//! `Tripflow` - free-form travel descriptions into ordered geocoded routes
//!
//! This library provides the location resolution pipeline: intent
//! extraction from raw text or photographed itineraries, repair of
//! malformed model output, layered coordinate resolution and validated
//! route assembly.

pub mod api;
pub mod assembler;
pub mod config;
pub mod error;
pub mod gazetteer;
pub mod geocode;
pub mod intent;
pub mod llm;
pub mod models;
pub mod ocr;
pub mod resolver;
pub mod sanitize;
pub mod web;

// Re-export core types for public API
pub use assembler::RoutePlanner;
pub use config::TripflowConfig;
pub use error::RouteError;
pub use gazetteer::{Gazetteer, GazetteerEntry};
pub use intent::IntentExtractor;
pub use models::{Intent, ResolvedLocation, Route, Stop};
pub use resolver::CoordinateResolver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RouteError>;
