//! Token matchers shared by the resolvers. Every pattern is compiled once and
//! reused; matchers hand back spans and parsed values, never raw captures.

use std::sync::OnceLock;

use regex::{Match, Regex};
use resit_core::Money;

use crate::normalize::parse_grouped;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

/// A number, either thousands-grouped or plain, with optional two decimals.
const NUM: &str = r"(?:\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+(?:\.\d{2})?)";
/// Ringgit markers, including the OCR split `R M`.
const CCY: &str = r"(?:RM|MYR|R\s*M)";
const SEP: &str = r"[:=\-\s]*";
const KW_TOTAL: &str = concat!(
    r"(?:grand\s*total|total\s*amount|total\s*payable|total\s*price|",
    r"net\s*amount|net\s*total|amount\s*due|amount\s*payable|balance\s*due|",
    r"total\s*after\s*discount|total\b)"
);

re!(re_price_token, &format!(
    r"(?i)(?P<ccy>{CCY})\s*(?P<ccyval>{NUM})|(?P<dec>\d{{1,3}}(?:,\d{{3}})+\.\d{{2}}|\d+\.\d{{2}})"
));
re!(re_kw_left, &format!(r"(?i){KW_TOTAL}{SEP}{CCY}?\s*({NUM})\b"));
re!(re_kw_right, &format!(r"(?i){KW_TOTAL}{SEP}({NUM})\s*{CCY}\b"));
re!(re_any_ccy, &format!(r"(?i){CCY}\s*({NUM})\b"));
re!(re_any_num, &format!(r"({NUM})"));

re!(re_qty_context,
    r"(?i)\b(?:qty|units?|pcs|pieces?|x\d+|\d+x)\b");
re!(re_stop,
    r"(?i)\b(?:grand\s*total|total|balance|remarks?|thanks?|cash(?:\s*rm)?)\b");
re!(re_quantity,
    r"(?i)\bqty\s*[:.=]?\s*(\d+)\b|\b(\d+)x\b|\bx(\d+)\b|\b(\d+)\s*(?:pcs|units?)\b");
re!(re_product_code,
    r"[A-Z]{2,}[A-Z0-9\-]*");
re!(re_postcode,
    r"\b\d{5}\b");

// ── Monetary tokens ──────────────────────────────────────────────────────────

/// Score for a number carrying a ringgit marker.
pub const SCORE_CURRENCY: u8 = 3;
/// Score for a bare two-decimal number.
pub const SCORE_BARE: u8 = 2;

/// A monetary token found on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCandidate {
    /// Byte offset of the numeric part within the line.
    pub start: usize,
    pub end: usize,
    pub value: Money,
    pub score: u8,
}

/// All monetary tokens on `line`, left to right. Plain integers are ignored
/// unless they carry a currency marker; bare decimals glued to letters are
/// skipped as part of a model number.
pub fn price_candidates(line: &str) -> Vec<PriceCandidate> {
    let mut hits = Vec::new();
    for caps in re_price_token().captures_iter(line) {
        let (m, score) = match (caps.name("ccyval"), caps.name("dec")) {
            (Some(m), _) => (m, SCORE_CURRENCY),
            (None, Some(m)) if !glued_to_text(line, m.start(), m.end()) => (m, SCORE_BARE),
            _ => continue,
        };
        if let Some(value) = parse_grouped(m.as_str()) {
            hits.push(PriceCandidate { start: m.start(), end: m.end(), value, score });
        }
    }
    hits
}

fn glued_to_text(line: &str, start: usize, end: usize) -> bool {
    let before = line[..start].chars().next_back();
    let after = line[end..].chars().next();
    before.is_some_and(|c| c.is_alphabetic()) || after.is_some_and(|c| c.is_alphanumeric())
}

/// Whether the ±10 characters around `start..end` mention a quantity or unit,
/// meaning the number is more likely a count than a price.
pub fn has_quantity_context(line: &str, start: usize, end: usize) -> bool {
    re_qty_context().is_match(surrounding(line, start, end, 10))
}

fn surrounding(line: &str, start: usize, end: usize, chars: usize) -> &str {
    let left = line[..start]
        .char_indices()
        .rev()
        .nth(chars.saturating_sub(1))
        .map_or(0, |(i, _)| i);
    let right = line[end..]
        .char_indices()
        .nth(chars)
        .map_or(line.len(), |(i, _)| end + i);
    &line[left..right]
}

/// Lines that open the totals or footer section of a receipt.
pub fn is_stop_line(line: &str) -> bool {
    re_stop().is_match(line)
}

/// Amounts anchored to a total keyword, number after the keyword first, then
/// the `TOTAL 12.00 RM` ordering.
pub fn keyword_totals(line: &str) -> impl Iterator<Item = Money> + '_ {
    [re_kw_left(), re_kw_right()]
        .into_iter()
        .filter_map(move |re| re.captures(line))
        .filter_map(|caps| parse_grouped(caps.get(1)?.as_str()))
}

/// Every currency-tagged amount on the line.
pub fn currency_amounts(line: &str) -> impl Iterator<Item = Money> + '_ {
    re_any_ccy()
        .captures_iter(line)
        .filter_map(|caps| parse_grouped(caps.get(1)?.as_str()))
}

/// Every number on the line, tagged or not.
pub fn bare_amounts(line: &str) -> impl Iterator<Item = Money> + '_ {
    re_any_num()
        .find_iter(line)
        .filter_map(|m| parse_grouped(m.as_str()))
}

// ── Items ────────────────────────────────────────────────────────────────────

/// Quantity printed on a line (`QTY: 2`, `2x`, `x2`, `2 pcs`), defaulting to 1.
pub fn quantity(line: &str) -> u32 {
    re_quantity()
        .captures(line)
        .and_then(|caps| caps.iter().skip(1).flatten().next().map(|m| m.as_str()))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(1)
}

/// First upper-case product code on the line (`KJ500`, `SF-1610`) that is not
/// part of a longer alphanumeric run.
pub fn product_code(line: &str) -> Option<&str> {
    re_product_code()
        .find_iter(line)
        .find(|m| {
            let before = line[..m.start()].chars().next_back();
            !before.is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        })
        .map(|m| m.as_str().trim_matches('-'))
        .filter(|code| !code.is_empty())
}

// ── Location ─────────────────────────────────────────────────────────────────

/// First standalone five-digit postcode.
pub fn postcode(line: &str) -> Option<Match<'_>> {
    re_postcode().find(line)
}

/// ASCII case-insensitive substring search returning the byte offset in
/// `haystack`.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
