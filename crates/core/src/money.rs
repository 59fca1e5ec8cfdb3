use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency code every monetary value is rendered with.
pub const CURRENCY_PREFIX: &str = "RM";

/// Smallest amount (in sen) accepted as a real purchase.
const PLAUSIBLE_MIN_CENTS: i64 = 200;
/// Largest amount (in sen) accepted as a real purchase.
const PLAUSIBLE_MAX_CENTS: i64 = 10_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("missing 'RM' prefix: '{0}'")]
    MissingPrefix(String),
    #[error("invalid amount: '{0}'")]
    InvalidAmount(String),
}

/// A ringgit amount, always held at two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Whether the value falls inside [RM2.00, RM100000.00]. Anything outside
    /// is treated as a misread (model numbers, years, phone fragments).
    pub fn is_plausible(self) -> bool {
        self >= Self::from_cents(PLAUSIBLE_MIN_CENTS) && self <= Self::from_cents(PLAUSIBLE_MAX_CENTS)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_PREFIX}{:.2}", self.0)
    }
}

/// Parses the canonical form only (`RM123.40`). Noisy OCR tokens go through
/// the normalizer in `resit-ocr` instead.
impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(CURRENCY_PREFIX)
            .ok_or_else(|| MoneyParseError::MissingPrefix(s.to_string()))?;
        let value = Decimal::from_str(digits)
            .map_err(|_| MoneyParseError::InvalidAmount(s.to_string()))?;
        Ok(Money::from_decimal(value))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
