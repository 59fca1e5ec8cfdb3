use resit_core::Money;

use crate::types::{InvalidReason, Product, Validity};

/// Final verdict for a receipt. Capture problems outrank anything extracted,
/// and a found amount is the only way to be valid: products alone never are.
///
/// `_products` is taken so the verdict is a function of every resolver output;
/// no current rule reads it.
pub fn decide_validity(
    image_missing: bool,
    ocr_failed: bool,
    amount: Option<Money>,
    _products: &[Product],
) -> Validity {
    match (image_missing, ocr_failed, amount) {
        (true, _, _) => Validity::Invalid(InvalidReason::ImageMissing),
        (false, true, _) => Validity::Invalid(InvalidReason::OcrFailed),
        (false, false, Some(_)) => Validity::Valid,
        (false, false, None) => {
            tracing::debug!("No total found");
            Validity::Invalid(InvalidReason::NoTotalFound)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
