use crate::amount::resolve_amount;
use crate::catalog::ReferenceCatalog;
use crate::location::resolve_location;
use crate::products::resolve_products;
use crate::store::resolve_store;
use crate::types::ExtractedFields;
use crate::validity::decide_validity;

/// Product columns offered by the submission sheet.
pub const DEFAULT_MAX_ITEMS: usize = 3;

/// How the receipt image fared before extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStatus {
    pub image_missing: bool,
    pub ocr_failed: bool,
}

impl CaptureStatus {
    pub fn image_missing() -> Self {
        Self { image_missing: true, ocr_failed: false }
    }

    pub fn ocr_failed() -> Self {
        Self { image_missing: false, ocr_failed: true }
    }
}

/// Turns the OCR lines of one receipt into [`ExtractedFields`].
///
/// Holds only read-only reference data, so one instance can be shared across
/// threads and reused for a whole batch.
#[derive(Debug, Clone)]
pub struct Extractor {
    catalog: ReferenceCatalog,
    max_items: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ReferenceCatalog::default())
    }
}

impl Extractor {
    pub fn new(catalog: ReferenceCatalog) -> Self {
        Self { catalog, max_items: DEFAULT_MAX_ITEMS }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Extract from successfully recognised lines.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> ExtractedFields {
        self.extract_with_status(lines, CaptureStatus::default())
    }

    pub fn extract_with_status<S: AsRef<str>>(
        &self,
        lines: &[S],
        status: CaptureStatus,
    ) -> ExtractedFields {
        let lines: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();

        let store = resolve_store(&lines, &self.catalog);
        let location = resolve_location(store.as_ref(), &lines, &self.catalog);
        let amount = resolve_amount(&lines, &self.catalog);
        let products = resolve_products(&lines, &self.catalog, self.max_items);
        let validity =
            decide_validity(status.image_missing, status.ocr_failed, amount, &products);

        ExtractedFields {
            amount,
            store: store.map(|s| s.name),
            location,
            products,
            validity,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, Verdict};
    use resit_core::Money;

    fn curated() -> ReferenceCatalog {
        ReferenceCatalog::default()
            .with_store_hints(["SENHENG", "HARVEY NORMAN"])
            .with_product_hints(["Stand Fan", "Air Fryer"])
            .with_store_locations([("Senheng Electric (KL) Sdn Bhd", "Cheras, WP Kuala Lumpur")])
    }

    const SENHENG_RECEIPT: &[&str] = &[
        "SENHENG ELECTRIC (KL) SDN BHD",
        "Lot 3, Jalan Raja Chulan",
        "43000 Kajang, Selangor",
        "TAX INVOICE",
        "1 KHIND Stand Fan SF1610",
        "   Qty: 2",
        "   RM179.80",
        "Subtotal RM179.80",
        "Total RM179.80",
        "Thank you",
    ];

    #[test]
    fn full_receipt_with_catalog() {
        let r = Extractor::new(curated()).extract(SENHENG_RECEIPT);
        assert_eq!(r.amount_text(), "RM179.80");
        assert_eq!(r.store.as_deref(), Some("SENHENG ELECTRIC (KL) SDN BHD"));
        // Curated mapping wins over the Selangor address printed on the receipt.
        assert_eq!(r.location.as_deref(), Some("Cheras, WP Kuala Lumpur"));
        assert_eq!(r.products[0], Product::new("Stand Fan", 1));
        assert_eq!(r.products[1], Product::new("1 KHIND Stand Fan SF1610", 1));
        assert!(r.products.len() <= DEFAULT_MAX_ITEMS);
        assert_eq!(r.verdict(), Verdict::Valid);
        assert_eq!(r.reason(), "");
    }

    #[test]
    fn full_receipt_without_catalog() {
        let r = Extractor::default().extract(SENHENG_RECEIPT);
        assert_eq!(r.amount, Some(Money::from_cents(17980)));
        assert_eq!(r.store.as_deref(), Some("SENHENG ELECTRIC (KL) SDN BHD"));
        assert_eq!(r.location.as_deref(), Some("Kajang, Selangor"));
        assert_eq!(r.products[0], Product::new("1 KHIND Stand Fan SF1610", 1));
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = Extractor::new(curated());
        let a = extractor.extract(SENHENG_RECEIPT);
        let b = extractor.extract(SENHENG_RECEIPT);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn receipt_without_total_is_invalid() {
        let r = Extractor::default().extract(&["KEDAI MAJU", "KHIND Iron", "Thank you"]);
        assert_eq!(r.amount, None);
        assert_eq!(r.products[0], Product::new("KHIND Iron", 1));
        assert_eq!(r.verdict(), Verdict::Invalid);
        assert_eq!(r.reason(), "No total found");
    }

    #[test]
    fn capture_status_outranks_amount() {
        let extractor = Extractor::default();
        let r = extractor.extract_with_status(SENHENG_RECEIPT, CaptureStatus::ocr_failed());
        assert_eq!(r.reason(), "OCR failed");
        let r = extractor.extract_with_status(&Vec::<String>::new(), CaptureStatus::image_missing());
        assert_eq!(r.reason(), "Image missing");
        assert_eq!(r.amount_text(), "");
        assert!(r.products.is_empty());
    }

    #[test]
    fn max_items_is_respected() {
        let lines = ["KHIND A", "KHIND B", "KHIND C", "KHIND D"];
        let r = Extractor::default().with_max_items(2).extract(&lines);
        assert_eq!(r.products.len(), 2);
    }

    #[test]
    fn accepts_owned_lines() {
        let lines: Vec<String> = vec!["AEON BIG".into(), "Total RM12.30".into()];
        let r = Extractor::default().extract(&lines);
        assert_eq!(r.amount_text(), "RM12.30");
        assert_eq!(r.store.as_deref(), Some("AEON BIG"));
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = Extractor::default().extract(&["!@#$%^&*()", "\0\x01\x02", "ØØØ 12,3,4.5.6 RM"]);
    }
}
