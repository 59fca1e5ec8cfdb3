use std::collections::HashSet;

use crate::catalog::ReferenceCatalog;
use crate::patterns::{contains_ignore_case, product_code, quantity};
use crate::types::Product;

/// Accumulates items up to the cap, skipping repeated (name, quantity) pairs
/// and remembering which lines the hint and marker stages used, so the
/// product-code stage only reads the rest.
struct ProductCollector {
    items: Vec<Product>,
    seen: HashSet<(String, u32)>,
    max_items: usize,
    claimed: Vec<bool>,
}

impl ProductCollector {
    fn new(line_count: usize, max_items: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            max_items,
            claimed: vec![false; line_count],
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.max_items
    }

    fn push(&mut self, name: &str, quantity: u32) {
        if self.is_full() {
            return;
        }
        if self.seen.insert((name.to_lowercase(), quantity)) {
            self.items.push(Product::new(name, quantity));
        }
    }
}

type Stage = fn(&[&str], &ReferenceCatalog, &mut ProductCollector);

const STAGES: &[(&str, Stage)] = &[
    ("curated_hint", curated_hints),
    ("marker_line", marker_lines),
    ("product_code", product_codes),
];

/// Up to `max_items` purchased items, curated names first.
pub fn resolve_products(lines: &[&str], catalog: &ReferenceCatalog, max_items: usize) -> Vec<Product> {
    let mut collector = ProductCollector::new(lines.len(), max_items);
    for (stage, collect) in STAGES {
        if collector.is_full() {
            break;
        }
        collect(lines, catalog, &mut collector);
        tracing::debug!(stage, items = collector.items.len(), "Product stage done");
    }
    collector.items
}

fn curated_hints(lines: &[&str], catalog: &ReferenceCatalog, out: &mut ProductCollector) {
    for (idx, line) in lines.iter().enumerate() {
        for hint in catalog.product_hints() {
            if contains_ignore_case(line, hint) {
                out.claimed[idx] = true;
                out.push(hint, quantity(line));
            }
        }
    }
}

fn marker_lines(lines: &[&str], catalog: &ReferenceCatalog, out: &mut ProductCollector) {
    for (idx, line) in lines.iter().enumerate() {
        if !contains_ignore_case(line, catalog.marker()) {
            continue;
        }
        out.claimed[idx] = true;
        out.push(line.trim(), quantity(line));
    }
}

fn product_codes(lines: &[&str], _catalog: &ReferenceCatalog, out: &mut ProductCollector) {
    for (idx, line) in lines.iter().enumerate() {
        if out.is_full() {
            break;
        }
        if out.claimed[idx] {
            continue;
        }
        if let Some(code) = product_code(line) {
            out.push(code, quantity(line));
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn names(products: &[Product]) -> Vec<(&str, u32)> {
        products.iter().map(|p| (p.name.as_str(), p.quantity)).collect()
    }

    #[test]
    fn curated_hints_use_canonical_casing() {
        let catalog = ReferenceCatalog::default().with_product_hints(["Stand Fan", "Air Fryer"]);
        let lines = ["1 khind stand fan SF1610 2x", "air fryer qty: 1"];
        let p = resolve_products(&lines, &catalog, 3);
        assert_eq!(
            names(&p),
            vec![("Stand Fan", 2), ("Air Fryer", 1), ("1 khind stand fan SF1610 2x", 2)]
        );
    }

    #[test]
    fn marker_lines_keep_verbatim_text() {
        let lines = ["  KHIND Kettle KT-1702  x2 ", "khind iron"];
        let p = resolve_products(&lines, &ReferenceCatalog::default(), 3);
        assert_eq!(names(&p), vec![("KHIND Kettle KT-1702  x2", 2), ("khind iron", 1)]);
    }

    #[test]
    fn product_codes_fill_remaining_slots() {
        let lines = ["KHIND Fan", "lowercase", "2 pcs SF-1610 stand fan"];
        let p = resolve_products(&lines, &ReferenceCatalog::default(), 3);
        assert_eq!(names(&p), vec![("KHIND Fan", 1), ("SF-1610", 2)]);
    }

    #[test]
    fn marker_line_kept_after_curated_hint() {
        let catalog = ReferenceCatalog::default().with_product_hints(["Blender"]);
        let lines = ["KHIND BLENDER BL1000"];
        let p = resolve_products(&lines, &catalog, 3);
        assert_eq!(names(&p), vec![("Blender", 1), ("KHIND BLENDER BL1000", 1)]);

        let catalog = ReferenceCatalog::default().with_product_hints(["Stand Fan"]);
        let p = resolve_products(&["1 KHIND Stand Fan SF1610"], &catalog, 3);
        assert_eq!(names(&p), vec![("Stand Fan", 1), ("1 KHIND Stand Fan SF1610", 1)]);
    }

    #[test]
    fn product_codes_skip_lines_used_earlier() {
        let catalog = ReferenceCatalog::default().with_product_hints(["Kettle"]);
        let lines = ["KT-1702 Kettle", "KHIND SF-1610", "AF-5000 fryer"];
        let p = resolve_products(&lines, &catalog, 5);
        assert_eq!(names(&p), vec![("Kettle", 1), ("KHIND SF-1610", 1), ("AF-5000", 1)]);
    }

    #[test]
    fn duplicates_are_skipped() {
        let lines = ["KHIND Fan", "khind fan", "KHIND Fan 2x"];
        let p = resolve_products(&lines, &ReferenceCatalog::default(), 3);
        assert_eq!(names(&p), vec![("KHIND Fan", 1), ("KHIND Fan 2x", 2)]);
    }

    #[test]
    fn never_exceeds_cap() {
        let lines = ["KHIND A", "KHIND B", "KHIND C", "KHIND D", "ABC123", "XYZ99"];
        for cap in 0..5 {
            let p = resolve_products(&lines, &ReferenceCatalog::default(), cap);
            assert!(p.len() <= cap);
            let mut seen = HashSet::new();
            for item in &p {
                assert!(seen.insert((item.name.to_lowercase(), item.quantity)));
            }
        }
    }

    #[test]
    fn no_lines_no_products() {
        assert!(resolve_products(&[], &ReferenceCatalog::default(), 3).is_empty());
    }
}
