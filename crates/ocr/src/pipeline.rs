use std::path::Path;
use thiserror::Error;

use crate::extract::{CaptureStatus, Extractor};
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ExtractedFields;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of a single receipt processing run.
#[derive(Debug)]
pub struct OcrResult {
    /// Recognized lines, empty when the image was missing or OCR failed.
    pub lines: Vec<String>,
    /// Structured fields extracted from the lines.
    pub extracted: ExtractedFields,
}

/// Orchestrates: read image → OCR → extract.
///
/// Blocking by nature; async callers should run it on a blocking thread.
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: R,
    extractor: Extractor,
}

impl<R: OcrBackend> ReceiptPipeline<R> {
    pub fn new(recognizer: R, extractor: Extractor) -> Self {
        Self { recognizer, extractor }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Read and recognize a file without extracting, surfacing every failure.
    pub fn recognize_file(&self, path: &Path) -> Result<Vec<String>, PipelineError> {
        let bytes = std::fs::read(path)?;
        Ok(self.recognizer.recognize(&bytes)?)
    }

    /// Process a file on disk. Read or OCR failures become an invalid record
    /// rather than an error, so one bad image never stops a batch.
    pub fn process_file(&self, path: &Path) -> OcrResult {
        match self.recognize_file(path) {
            Ok(lines) => self.finish(lines, CaptureStatus::default()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "OCR failed");
                self.finish(Vec::new(), CaptureStatus::ocr_failed())
            }
        }
    }

    /// Process raw image bytes.
    pub fn process_bytes(&self, data: &[u8]) -> OcrResult {
        match self.recognizer.recognize(data) {
            Ok(lines) => self.finish(lines, CaptureStatus::default()),
            Err(e) => {
                tracing::warn!(error = %e, "OCR failed");
                self.finish(Vec::new(), CaptureStatus::ocr_failed())
            }
        }
    }

    /// Record for a submission that has no image to read.
    pub fn missing_image(&self) -> OcrResult {
        self.finish(Vec::new(), CaptureStatus::image_missing())
    }

    fn finish(&self, lines: Vec<String>, status: CaptureStatus) -> OcrResult {
        let extracted = self.extractor.extract_with_status(&lines, status);
        OcrResult { lines, extracted }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
