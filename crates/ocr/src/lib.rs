pub mod amount;
pub mod catalog;
pub mod extract;
pub mod location;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod price;
pub mod products;
pub mod recognizer;
pub mod store;
pub mod types;
pub mod validity;

pub use catalog::{normalize_key, CatalogConfig, CatalogError, ReferenceCatalog};
pub use extract::{CaptureStatus, Extractor, DEFAULT_MAX_ITEMS};
pub use normalize::normalize_amount;
pub use pipeline::{OcrResult, PipelineError, ReceiptPipeline};
pub use recognizer::{split_lines, MockRecognizer, NoBackend, OcrBackend, OcrError};
pub use types::{ExtractedFields, InvalidReason, Product, Validity, Verdict};
