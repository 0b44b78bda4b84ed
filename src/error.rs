//! Error types and handling for the `tripflow` pipeline

use thiserror::Error;

/// Main error type for the `tripflow` pipeline
///
/// Transport and parse noise from the backing services is converted into one
/// of these conditions as close to the source as possible; no raw client
/// error crosses the pipeline boundary.
#[derive(Error, Debug)]
pub enum RouteError {
    /// The language model output could not be repaired into structured data.
    /// Internal: the intent extractor always absorbs this and falls back
    #[error("Malformed model output: {snippet}")]
    MalformedModelOutput { snippet: String },

    /// A backing service request could not be completed
    #[error("Upstream service unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// A stop could not be resolved to real coordinates
    #[error("Place not recognized: '{name}'")]
    PlaceNotRecognized { name: String },

    /// OCR produced no usable text
    #[error("No text could be recognized in the image")]
    EmptyRecognizedText,
}

impl RouteError {
    /// Create a new malformed-output error from the cleaned model text
    pub fn malformed<S: Into<String>>(snippet: S) -> Self {
        Self::MalformedModelOutput {
            snippet: snippet.into(),
        }
    }

    /// Create a new upstream-unavailable error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// Create a new unrecognized-place error naming the offending stop
    pub fn unrecognized<S: Into<String>>(name: S) -> Self {
        Self::PlaceNotRecognized { name: name.into() }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RouteError::MalformedModelOutput { .. } => {
                "The language model returned unreadable output.".to_string()
            }
            RouteError::UpstreamUnavailable { .. } => {
                "Unable to reach a backing service. Please try again later.".to_string()
            }
            RouteError::PlaceNotRecognized { name } => {
                format!("Could not recognize the place '{name}'. Please check the spelling.")
            }
            RouteError::EmptyRecognizedText => {
                "No readable text was found in the uploaded image.".to_string()
            }
        }
    }

    /// Whether retrying the same request later can succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, RouteError::UpstreamUnavailable { .. })
    }
}
