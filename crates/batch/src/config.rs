use std::path::Path;

use resit_ocr::{CatalogConfig, Extractor, ReferenceCatalog, DEFAULT_MAX_ITEMS};
use serde::Deserialize;

use crate::error::BatchError;

/// Batch settings file: the catalog tables at top level plus run knobs.
///
/// ```toml
/// marker = "KHIND"
/// max_items = 3
/// store_hints = ["SENHENG"]
///
/// [store_locations]
/// "SENHENG" = "Cheras, WP Kuala Lumpur"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub catalog: CatalogConfig,
    pub max_items: usize,
    pub workers: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            max_items: DEFAULT_MAX_ITEMS,
            workers: None,
        }
    }
}

impl Settings {
    pub fn from_toml(toml_content: &str) -> Result<Self, BatchError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, BatchError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), max_items = settings.max_items, "Loaded settings");
        Ok(settings)
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(ReferenceCatalog::from_config(self.catalog.clone()))
            .with_max_items(self.max_items)
    }

    /// Explicit setting, else one worker per available core.
    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|&n| n > 0)
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let s = Settings::from_toml("").unwrap();
        assert_eq!(s.max_items, DEFAULT_MAX_ITEMS);
        assert!(s.workers.is_none());
        assert_eq!(s.extractor().catalog().marker(), "KHIND");
        assert!(s.worker_count() >= 1);
    }

    #[test]
    fn catalog_tables_and_knobs_share_one_file() {
        let s = Settings::from_toml(
            r#"
            marker = "ACME"
            max_items = 2
            workers = 8
            store_hints = ["SENHENG"]

            [store_locations]
            "SENHENG" = "Cheras, WP Kuala Lumpur"
            "#,
        )
        .unwrap();
        assert_eq!(s.max_items, 2);
        assert_eq!(s.worker_count(), 8);

        let extractor = s.extractor();
        assert_eq!(extractor.max_items(), 2);
        assert_eq!(extractor.catalog().marker(), "ACME");
        assert_eq!(extractor.catalog().store_hints(), ["SENHENG".to_string()]);
        assert_eq!(extractor.catalog().store_locations().len(), 1);
    }

    #[test]
    fn zero_workers_means_auto() {
        let s = Settings { workers: Some(0), ..Settings::default() };
        assert!(s.worker_count() >= 1);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(Settings::from_toml("max_items = \"three\""), Err(BatchError::Settings(_))));
    }

    #[test]
    fn bundled_catalog_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../catalog/khind.toml");
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.max_items, 3);
        assert!(!s.extractor().catalog().store_hints().is_empty());
    }
}
