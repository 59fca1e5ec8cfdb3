use resit_core::Money;

use crate::patterns::{
    contains_ignore_case, has_quantity_context, is_stop_line, price_candidates, PriceCandidate,
};

/// Marker line plus the four lines after it. OCR often wraps an item row so
/// the price lands one to three lines below the description.
const WINDOW_LINES: usize = 5;

/// Price of the tracked item, found on or below a line containing `marker`.
///
/// Each marker line opens a window that ends early at the first totals/footer
/// line. Windows are read bottom-up and the first qualifying price wins.
pub fn resolve_target_price(lines: &[&str], marker: &str) -> Option<Money> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| contains_ignore_case(line, marker))
        .find_map(|(idx, _)| {
            let window: Vec<&str> = lines[idx..]
                .iter()
                .take(WINDOW_LINES)
                .take_while(|line| !is_stop_line(line))
                .copied()
                .collect();
            let price = window.iter().rev().find_map(|line| best_price_on_line(line));
            if let Some(price) = price {
                tracing::debug!(marker_line = idx, window = window.len(), %price, "Target item price");
            }
            price
        })
}

/// Highest-scoring candidate on the line, rightmost among equals, skipping
/// implausible values and anything sitting next to quantity wording. When no
/// top-score candidate survives, the rest are tried right to left.
fn best_price_on_line(line: &str) -> Option<Money> {
    let candidates = price_candidates(line);
    let top = candidates.iter().map(|c| c.score).max()?;
    let qualifies = |c: &&PriceCandidate| {
        c.value.is_plausible() && !has_quantity_context(line, c.start, c.end)
    };

    candidates
        .iter()
        .rev()
        .filter(|c| c.score == top)
        .find(qualifies)
        .or_else(|| candidates.iter().rev().find(qualifies))
        .map(|c| c.value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn price(lines: &[&str]) -> Option<String> {
        resolve_target_price(lines, "KHIND").map(|m| m.to_string())
    }

    #[test]
    fn price_on_later_line_crosses_quantity_line() {
        assert_eq!(price(&["KHIND Fan Deluxe", "Qty: 2", "RM89.90"]).as_deref(), Some("RM89.90"));
    }

    #[test]
    fn window_stops_at_total_line() {
        assert_eq!(price(&["KHIND Blender", "Total RM150.00", "RM45.00"]), None);
    }

    #[test]
    fn marker_line_that_is_a_total_opens_no_window() {
        assert_eq!(price(&["KHIND TOTAL RM99.00"]), None);
    }

    #[test]
    fn rightmost_among_currency_tokens() {
        assert_eq!(price(&["KHIND Kettle RM45.00 RM90.00"]).as_deref(), Some("RM90.00"));
    }

    #[test]
    fn currency_token_beats_rightmost_bare() {
        assert_eq!(price(&["KHIND Kettle RM45.00 90.00"]).as_deref(), Some("RM45.00"));
    }

    #[test]
    fn bare_used_when_currency_out_of_bound() {
        assert_eq!(price(&["KHIND Iron RM1.00 45.00"]).as_deref(), Some("RM45.00"));
    }

    #[test]
    fn bottom_of_window_preferred() {
        let lines = ["KHIND Stand Fan RM10.00", "16 inch", "RM159.00"];
        assert_eq!(price(&lines).as_deref(), Some("RM159.00"));
    }

    #[test]
    fn quantity_context_rejected() {
        assert_eq!(price(&["KHIND Iron", "2 pcs 45.90"]), None);
    }

    #[test]
    fn price_outside_window_ignored() {
        let lines = ["KHIND Fan", "a", "b", "c", "d", "RM50.00"];
        assert_eq!(price(&lines), None);
    }

    #[test]
    fn second_marker_window_used_when_first_is_empty() {
        let lines = ["KHIND Fan", "Total RM30.00", "KHIND Kettle RM45.00"];
        assert_eq!(price(&lines).as_deref(), Some("RM45.00"));
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        assert_eq!(price(&["Khind air fryer 299.00"]).as_deref(), Some("RM299.00"));
    }

    #[test]
    fn no_marker_no_price() {
        assert_eq!(price(&["Philips Iron RM89.00"]), None);
        assert_eq!(price(&[]), None);
    }
}
