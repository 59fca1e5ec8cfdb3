use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("No OCR engine compiled in; rebuild with the `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept raw PNG/JPEG image bytes and return the recognized
/// lines in top-to-bottom order.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError>;
}

/// Split engine output into ordered, non-blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns pre-set lines (or a pre-set failure) regardless of the image, so the
/// pipeline can be tested without Tesseract installed.
pub struct MockRecognizer {
    outcome: Result<Vec<String>, String>,
}

impl MockRecognizer {
    pub fn new(text: &str) -> Self {
        Self { outcome: Ok(split_lines(text)) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { outcome: Err(message.into()) }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        self.outcome.clone().map_err(OcrError::Engine)
    }
}

/// Stand-in used when no engine is compiled in. Every image fails, so each
/// receipt is reported as an OCR failure instead of aborting the run.
pub struct NoBackend;

impl OcrBackend for NoBackend {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{split_lines, OcrBackend, OcrError};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let text = lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(split_lines(&text))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
