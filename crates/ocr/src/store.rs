use crate::catalog::{normalize_key, ReferenceCatalog, GENERIC_STORE_HINTS};
use crate::patterns::contains_ignore_case;

/// Merchant identity is assumed to sit in the receipt header.
const STORE_SCAN_LINES: usize = 10;

/// The resolved merchant line plus the key used for curated location lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMatch {
    pub name: String,
    pub key: String,
}

type Strategy = for<'a> fn(&[&'a str], &ReferenceCatalog) -> Option<&'a str>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("curated_hint", curated_hint),
    ("generic_hint", generic_hint),
    ("uppercase_header", uppercase_header),
    ("first_line", first_non_empty),
];

/// Pick the merchant name from the top of the receipt.
pub fn resolve_store(lines: &[&str], catalog: &ReferenceCatalog) -> Option<StoreMatch> {
    let top: Vec<&str> = lines
        .iter()
        .take(STORE_SCAN_LINES)
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    STRATEGIES.iter().find_map(|(strategy, resolve)| {
        let name = resolve(&top, catalog)?;
        tracing::debug!(strategy, store = name, "Store resolved");
        Some(StoreMatch { name: name.to_string(), key: normalize_key(name) })
    })
}

/// Longer lines carry more context (full legal names), so they win. Ties keep
/// the earlier line.
fn longest<'a>(candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates.fold(None, |best, line| match best {
        Some(b) if b.chars().count() >= line.chars().count() => Some(b),
        _ => Some(line),
    })
}

fn curated_hint<'a>(top: &[&'a str], catalog: &ReferenceCatalog) -> Option<&'a str> {
    let hints = catalog.store_hints();
    longest(
        top.iter()
            .copied()
            .filter(|line| hints.iter().any(|h| contains_ignore_case(line, h))),
    )
}

fn generic_hint<'a>(top: &[&'a str], _catalog: &ReferenceCatalog) -> Option<&'a str> {
    longest(
        top.iter()
            .copied()
            .filter(|line| GENERIC_STORE_HINTS.iter().any(|h| contains_ignore_case(line, h))),
    )
}

fn uppercase_header<'a>(top: &[&'a str], _catalog: &ReferenceCatalog) -> Option<&'a str> {
    longest(top.iter().copied().filter(|line| {
        line.chars().any(char::is_alphabetic) && line.to_uppercase() == *line
    }))
}

fn first_non_empty<'a>(top: &[&'a str], _catalog: &ReferenceCatalog) -> Option<&'a str> {
    top.first().copied()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
