use resit_core::Money;

use crate::catalog::ReferenceCatalog;
use crate::patterns::{bare_amounts, currency_amounts, keyword_totals};
use crate::price::resolve_target_price;

type Strategy = fn(&[&str], &ReferenceCatalog) -> Option<Money>;

/// Most specific first. Every strategy only returns plausible values, so an
/// implausible total simply lets the next one run.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("target_item", target_item),
    ("keyword_total", keyword_total),
    ("max_currency", max_currency),
    ("max_bare", max_bare),
];

/// Amount spent on the receipt.
pub fn resolve_amount(lines: &[&str], catalog: &ReferenceCatalog) -> Option<Money> {
    if lines.is_empty() {
        return None;
    }
    STRATEGIES.iter().find_map(|(strategy, resolve)| {
        let amount = resolve(lines, catalog)?;
        tracing::debug!(strategy, %amount, "Amount resolved");
        Some(amount)
    })
}

fn target_item(lines: &[&str], catalog: &ReferenceCatalog) -> Option<Money> {
    resolve_target_price(lines, catalog.marker())
}

fn keyword_total(lines: &[&str], _catalog: &ReferenceCatalog) -> Option<Money> {
    lines
        .iter()
        .find_map(|line| keyword_totals(line).find(|m| m.is_plausible()))
}

fn max_currency(lines: &[&str], _catalog: &ReferenceCatalog) -> Option<Money> {
    lines
        .iter()
        .flat_map(|line| currency_amounts(line))
        .filter(|m| m.is_plausible())
        .max()
}

fn max_bare(lines: &[&str], _catalog: &ReferenceCatalog) -> Option<Money> {
    lines
        .iter()
        .flat_map(|line| bare_amounts(line))
        .filter(|m| m.is_plausible())
        .max()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
