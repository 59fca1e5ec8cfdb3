use resit_core::Money;
use serde::{Deserialize, Serialize, Serializer};

/// One purchased line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub quantity: u32,
}

impl Product {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self { name: name.into(), quantity }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Valid,
    Invalid,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Valid => write!(f, "VALID"),
            Verdict::Invalid => write!(f, "INVALID"),
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VALID" => Ok(Verdict::Valid),
            "INVALID" => Ok(Verdict::Invalid),
            other => Err(format!("Unknown verdict: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    ImageMissing,
    OcrFailed,
    NoTotalFound,
}

impl InvalidReason {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidReason::ImageMissing => "Image missing",
            InvalidReason::OcrFailed => "OCR failed",
            InvalidReason::NoTotalFound => "No total found",
        }
    }
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final verdict for a receipt. A valid receipt has no reason attached, so the
/// two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(InvalidReason),
}

impl Validity {
    pub fn verdict(self) -> Verdict {
        match self {
            Validity::Valid => Verdict::Valid,
            Validity::Invalid(_) => Verdict::Invalid,
        }
    }

    /// Empty for valid receipts.
    pub fn reason(self) -> &'static str {
        match self {
            Validity::Valid => "",
            Validity::Invalid(reason) => reason.as_str(),
        }
    }
}

/// Everything pulled out of one receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Amount spent, always within the plausibility bound.
    pub amount: Option<Money>,
    pub store: Option<String>,
    pub location: Option<String>,
    /// At most the extractor's `max_items`, no duplicate (name, quantity) pairs.
    pub products: Vec<Product>,
    pub validity: Validity,
}

impl ExtractedFields {
    /// Canonical amount string (`RM123.40`), or empty when nothing was found.
    pub fn amount_text(&self) -> String {
        self.amount.map(|m| m.to_string()).unwrap_or_default()
    }

    pub fn verdict(&self) -> Verdict {
        self.validity.verdict()
    }

    pub fn reason(&self) -> &'static str {
        self.validity.reason()
    }
}

#[derive(Serialize)]
struct FieldsRecord<'a> {
    amount: String,
    store: &'a str,
    location: &'a str,
    products: &'a [Product],
    verdict: Verdict,
    reason: &'static str,
}

impl Serialize for ExtractedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FieldsRecord {
            amount: self.amount_text(),
            store: self.store.as_deref().unwrap_or(""),
            location: self.location.as_deref().unwrap_or(""),
            products: &self.products,
            verdict: self.verdict(),
            reason: self.reason(),
        }
        .serialize(serializer)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
