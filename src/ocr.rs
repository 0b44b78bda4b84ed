//! Image text recognition capability
//!
//! The trait is synchronous because the bundled engine is blocking; the
//! planner bridges onto the blocking pool. An empty string is a legal
//! "nothing recognized" outcome and is how total recognition failure is
//! reported downstream.

use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

/// Narrow OCR capability: image bytes in, recognized text out
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<String>;
}

/// Combined-script language hint tried first
pub const PRIMARY_LANGUAGES: &str = "chi_sim+eng";

/// Latin-only fallback when the combined pack is unavailable
pub const FALLBACK_LANGUAGES: &str = "eng";

/// Tesseract-backed recognizer, available with the `ocr` feature
#[cfg(feature = "ocr")]
pub struct TesseractRecognizer;

#[cfg(feature = "ocr")]
impl TesseractRecognizer {
    fn recognize_with_lang(image: &[u8], lang: &str) -> Result<String> {
        let mut engine = tesseract::Tesseract::new(None, Some(lang))
            .map_err(|e| anyhow::anyhow!("OCR init failed: {e:?}"))?
            .set_image_from_mem(image)
            .map_err(|e| anyhow::anyhow!("OCR image load failed: {e:?}"))?;

        engine
            .get_text()
            .map_err(|e| anyhow::anyhow!("OCR recognition failed: {e:?}"))
    }
}

#[cfg(feature = "ocr")]
impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &[u8]) -> Result<String> {
        match Self::recognize_with_lang(image, PRIMARY_LANGUAGES) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(
                    "Combined-script OCR failed ({}), retrying with '{}'",
                    e, FALLBACK_LANGUAGES
                );
                Self::recognize_with_lang(image, FALLBACK_LANGUAGES)
            }
        }
    }
}

/// Recognizer used when the crate is built without the `ocr` feature.
/// Reports empty text, which surfaces as `EmptyRecognizedText` upstream
pub struct DisabledRecognizer;

impl TextRecognizer for DisabledRecognizer {
    fn recognize(&self, _image: &[u8]) -> Result<String> {
        warn!("OCR requested but this build has no recognizer");
        Ok(String::new())
    }
}

/// The recognizer this build ships with
#[cfg(feature = "ocr")]
#[must_use]
pub fn default_recognizer() -> Arc<dyn TextRecognizer> {
    Arc::new(TesseractRecognizer)
}

/// The recognizer this build ships with
#[cfg(not(feature = "ocr"))]
#[must_use]
pub fn default_recognizer() -> Arc<dyn TextRecognizer> {
    Arc::new(DisabledRecognizer)
}
