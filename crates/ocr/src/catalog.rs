use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Marker identifying the tracked product line.
pub const DEFAULT_MARKER: &str = "KHIND";

/// Malaysian states and federal territories recognised on receipts.
pub const MALAYSIAN_STATES: &[&str] = &[
    "Johor", "Kedah", "Kelantan", "Malacca", "Melaka", "Negeri Sembilan", "Pahang", "Penang",
    "Pulau Pinang", "Perak", "Perlis", "Sabah", "Sarawak", "Selangor", "Terengganu",
    "Kuala Lumpur", "WP Kuala Lumpur", "Labuan", "Putrajaya",
];

/// Chain names, legal-entity suffixes and shop-category words that usually
/// only appear in a receipt header.
pub const GENERIC_STORE_HINTS: &[&str] = &[
    "AEON", "SENHENG", "HARVEY NORMAN", "ECONSAVE", "JAYA GROCER", "HOMEPRO", "SHOPEE",
    "LAZADA", "SDN BHD", "SDN. BHD", "ENTERPRISE", "TRADING", "ELECTRICAL", "SUPERMARKET",
    "HYPER", "STORE", "LIGHTING", "HOUSEWARE", "HARDWARE",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// On-disk shape of a catalog. Every table is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub marker: Option<String>,
    pub store_hints: Option<Vec<String>>,
    pub product_hints: Option<Vec<String>>,
    pub store_locations: Option<BTreeMap<String, String>>,
    pub regions: Option<Vec<String>>,
}

/// Read-only reference data the resolvers consult before falling back to
/// generic heuristics.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    marker: String,
    store_hints: Vec<String>,
    product_hints: Vec<String>,
    /// Keyed by [`normalize_key`] of the store name.
    store_locations: BTreeMap<String, String>,
    /// Longest first, so "WP Kuala Lumpur" wins over "Kuala Lumpur".
    regions: Vec<String>,
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            store_hints: Vec::new(),
            product_hints: Vec::new(),
            store_locations: BTreeMap::new(),
            regions: by_length_desc(MALAYSIAN_STATES.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl ReferenceCatalog {
    pub fn from_config(config: CatalogConfig) -> Self {
        let mut catalog = Self::default();
        if let Some(marker) = config.marker.filter(|m| !m.trim().is_empty()) {
            catalog.marker = marker.trim().to_string();
        }
        if let Some(hints) = config.store_hints {
            catalog = catalog.with_store_hints(hints);
        }
        if let Some(hints) = config.product_hints {
            catalog = catalog.with_product_hints(hints);
        }
        if let Some(locations) = config.store_locations {
            catalog = catalog.with_store_locations(locations);
        }
        if let Some(regions) = config.regions {
            catalog = catalog.with_regions(regions);
        }
        catalog
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, CatalogError> {
        let config: CatalogConfig = toml::from_str(toml_content)?;
        Ok(Self::from_config(config))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            store_hints = catalog.store_hints.len(),
            product_hints = catalog.product_hints.len(),
            store_locations = catalog.store_locations.len(),
            regions = catalog.regions.len(),
            "Loaded reference catalog"
        );
        Ok(catalog)
    }

    /// Curated store names, highest priority first.
    pub fn with_store_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_hints = non_blank(hints);
        self
    }

    pub fn with_product_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_hints = non_blank(hints);
        self
    }

    pub fn with_store_locations<I, K, V>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.store_locations = locations
            .into_iter()
            .map(|(k, v)| (normalize_key(k.as_ref()), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        self
    }

    /// Replaces the built-in state list. An empty list keeps the built-ins.
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let regions = non_blank(regions);
        if !regions.is_empty() {
            self.regions = by_length_desc(regions);
        }
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn store_hints(&self) -> &[String] {
        &self.store_hints
    }

    pub fn product_hints(&self) -> &[String] {
        &self.product_hints
    }

    pub fn store_locations(&self) -> &BTreeMap<String, String> {
        &self.store_locations
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }
}

/// Lower-case a store name and collapse every run of whitespace or punctuation
/// into one space: `"AEON Big (M) Sdn. Bhd."` → `"aeon big m sdn bhd"`.
pub fn normalize_key(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_blank<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .map(|s: String| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn by_length_desc(mut names: Vec<String>) -> Vec<String> {
    names.sort_by(|a, b| b.len().cmp(&a.len()));
    names
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_builtin_regions_only() {
        let c = ReferenceCatalog::default();
        assert_eq!(c.marker(), "KHIND");
        assert!(c.store_hints().is_empty());
        assert!(c.product_hints().is_empty());
        assert!(c.store_locations().is_empty());
        assert_eq!(c.regions().len(), MALAYSIAN_STATES.len());
        let pos = |name: &str| c.regions().iter().position(|r| r == name).unwrap();
        assert!(pos("WP Kuala Lumpur") < pos("Kuala Lumpur"));
        assert!(pos("Pulau Pinang") < pos("Perak"));
    }

    #[test]
    fn normalize_key_collapses_punctuation() {
        assert_eq!(normalize_key("AEON Big (M) Sdn. Bhd."), "aeon big m sdn bhd");
        assert_eq!(normalize_key("  SENHENG -- Sunway  "), "senheng sunway");
        assert_eq!(normalize_key("***"), "");
    }

    #[test]
    fn store_location_keys_are_normalized() {
        let c = ReferenceCatalog::default()
            .with_store_locations([("Senheng Electric (KL) Sdn Bhd", "Kuala Lumpur, WP Kuala Lumpur")]);
        assert_eq!(
            c.store_locations().get("senheng electric kl sdn bhd").map(String::as_str),
            Some("Kuala Lumpur, WP Kuala Lumpur")
        );
    }

    #[test]
    fn blank_hints_are_dropped() {
        let c = ReferenceCatalog::default().with_store_hints(["", "  ", "AEON BIG"]);
        assert_eq!(c.store_hints(), ["AEON BIG".to_string()]);
    }

    #[test]
    fn empty_region_list_keeps_builtins() {
        let c = ReferenceCatalog::default().with_regions(Vec::<String>::new());
        assert_eq!(c.regions().len(), MALAYSIAN_STATES.len());
    }

    #[test]
    fn from_toml_partial() {
        let toml = r#"
            marker = "Khind"
            product_hints = ["Stand Fan", "Air Fryer"]

            [store_locations]
            "HomePro Mid Valley" = "Kuala Lumpur, WP Kuala Lumpur"
        "#;
        let c = ReferenceCatalog::from_toml(toml).unwrap();
        assert_eq!(c.marker(), "Khind");
        assert_eq!(c.product_hints().len(), 2);
        assert!(c.store_hints().is_empty());
        assert!(c.store_locations().contains_key("homepro mid valley"));
        assert_eq!(c.regions().len(), MALAYSIAN_STATES.len());
    }

    #[test]
    fn from_toml_rejects_bad_types() {
        assert!(matches!(
            ReferenceCatalog::from_toml("store_hints = 3"),
            Err(CatalogError::Toml(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, "store_hints = [\"SENHENG\"]\n").unwrap();
        let c = ReferenceCatalog::load(&path).unwrap();
        assert_eq!(c.store_hints(), ["SENHENG".to_string()]);

        let missing = ReferenceCatalog::load(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(CatalogError::Io(_))));
    }
}
