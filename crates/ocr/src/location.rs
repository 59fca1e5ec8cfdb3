use crate::catalog::ReferenceCatalog;
use crate::patterns::{contains_ignore_case, find_ignore_case, postcode};
use crate::store::StoreMatch;

/// Addresses usually sit in the header; the footer is searched bottom-up after.
const HEAD_LINES: usize = 20;

struct LocationInput<'a> {
    store: Option<&'a StoreMatch>,
    lines: &'a [&'a str],
    catalog: &'a ReferenceCatalog,
}

type Strategy = fn(&LocationInput<'_>) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("curated_map", curated_map),
    ("receipt_text", receipt_text),
];

/// Resolve a `"City, Region"` (or bare region) for the receipt.
///
/// Submitter-provided city/state is deliberately not an input here; showing it
/// when nothing was recognised is a presentation decision for the caller.
pub fn resolve_location(
    store: Option<&StoreMatch>,
    lines: &[&str],
    catalog: &ReferenceCatalog,
) -> Option<String> {
    let input = LocationInput { store, lines, catalog };
    STRATEGIES.iter().find_map(|(strategy, resolve)| {
        let location = resolve(&input)?;
        tracing::debug!(strategy, location = %location, "Location resolved");
        Some(location)
    })
}

fn curated_map(input: &LocationInput<'_>) -> Option<String> {
    let store = input.store?;
    let map = input.catalog.store_locations();
    map.get(&store.key)
        .or_else(|| {
            map.iter()
                .find(|(key, _)| store.key.contains(key.as_str()))
                .map(|(_, location)| location)
        })
        .cloned()
}

fn receipt_text(input: &LocationInput<'_>) -> Option<String> {
    let regions = input.catalog.regions();
    let split = input.lines.len().min(HEAD_LINES);
    let (head, tail) = input.lines.split_at(split);
    head.iter()
        .chain(tail.iter().rev())
        .find_map(|line| location_from_line(line, regions))
}

/// Parse one line for a region name and, when possible, the city before it.
pub fn location_from_line(line: &str, regions: &[String]) -> Option<String> {
    let (start, region) = regions
        .iter()
        .find_map(|r| find_ignore_case(line, r).map(|i| (i, r)))?;
    let end = start + region.len();

    let city = match postcode(line) {
        Some(pc) => city_near_postcode(line, (pc.start(), pc.end()), (start, end))
            .or_else(|| city_from_segments(line, region)),
        None => city_from_segments(line, region),
    };

    Some(match city {
        Some(city) => format!("{city}, {region}"),
        None => region.clone(),
    })
}

/// `"Lot 5, 47500 SUBANG JAYA, Selangor"` → `"Subang Jaya"`.
fn city_near_postcode(line: &str, postcode: (usize, usize), region: (usize, usize)) -> Option<String> {
    let between = if postcode.1 <= region.0 {
        &line[postcode.1..region.0]
    } else if region.1 <= postcode.0 {
        &line[region.1..postcode.0]
    } else {
        return None;
    };

    let words: Vec<String> = between
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() >= 2)
        .map(title_case)
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// `"No 3, Petaling Jaya, Selangor"` → `"Petaling Jaya"`.
fn city_from_segments(line: &str, region: &str) -> Option<String> {
    let segments: Vec<&str> = line.split([',', ';', '|', '-']).collect();
    let idx = segments.iter().position(|s| contains_ignore_case(s, region))?;
    let city = segments[..idx].last()?.trim();
    (!city.is_empty()).then(|| city.to_string())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
