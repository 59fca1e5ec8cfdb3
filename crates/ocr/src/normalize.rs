use resit_core::Money;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Turn a noisy numeric token (`RM 1,234.56`, `12,50`, `R M89.9O`) into a
/// ringgit amount.
///
/// Only digits, `.` and `,` survive. When the group after the last `.` is all
/// digits the dot is the decimal point and commas are thousands separators.
/// Otherwise, when the group after the last `,` is all digits, the roles swap:
/// `1,234` reads as 1.234 and `1,234,567` has no value. Anything else has every
/// separator removed.
///
/// Never fails: unparsable input yields `None`.
pub fn normalize_amount(raw: &str) -> Option<Money> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let dot_decimal = cleaned
        .rsplit_once('.')
        .is_some_and(|(_, tail)| is_digits(tail));
    let comma_decimal = !dot_decimal
        && cleaned
            .rsplit_once(',')
            .is_some_and(|(_, tail)| is_digits(tail));

    let canonical = if dot_decimal {
        cleaned.replace(',', "")
    } else if comma_decimal {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.replace([',', '.'], "")
    };

    Decimal::from_str(&canonical).ok().map(Money::from_decimal)
}

/// Parse a token already matched by a monetary pattern (`1,234.50`,
/// `12,345`), where commas can only be thousands separators.
pub fn parse_grouped(token: &str) -> Option<Money> {
    Decimal::from_str(&token.replace(',', "")).ok().map(Money::from_decimal)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
