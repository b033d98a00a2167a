//! Deterministic text cleanup applied before validation and encoding
//!
//! All functions are pure; empty input yields empty output, never an error.
//! Amounts are carried internally as integer centavos to keep the payload
//! byte-exact and free of floating-point rounding.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

/// Upper bound on payload amounts, in centavos (999 999 999,99 BRL)
pub const MAX_AMOUNT_CENTAVOS: u64 = 99_999_999_999;

/// Strip diacritics (NFD decomposition, combining marks dropped) and trim
/// surrounding whitespace.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a reference label: diacritics stripped, all whitespace removed,
/// uppercased.
///
/// ```
/// assert_eq!(pix_brcode::normalize_reference("joão  silva"), "JOAOSILVA");
/// ```
pub fn normalize_reference(reference: &str) -> String {
    normalize(reference)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Normalize an amount string: whitespace removed, the `R$` currency token
/// dropped, decimal comma replaced by a period.
pub fn normalize_amount(amount: &str) -> String {
    amount
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace("R$", "")
        .replace(',', ".")
}

/// Parse a normalized decimal amount into centavos.
///
/// Accepts at most one decimal point and at most two fractional digits; any
/// non-digit character (including a sign) is rejected. Zero parses
/// successfully — whether a zero amount appears in a payload is the
/// builder's decision.
pub fn parse_amount(amount: &str) -> Result<u64> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(Error::InvalidAmount("empty amount".to_string()));
    }

    let parts: Vec<&str> = amount.split('.').collect();
    if parts.len() > 2 {
        return Err(Error::InvalidAmount(format!(
            "multiple decimal points: {amount}"
        )));
    }

    let whole_part = parts[0];
    let frac_part = if parts.len() == 2 { parts[1] } else { "" };

    if !whole_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!(
            "invalid whole part: {whole_part:?}"
        )));
    }
    if !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!(
            "invalid fractional part: {frac_part:?}"
        )));
    }
    if whole_part.is_empty() && frac_part.is_empty() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    if frac_part.len() > 2 {
        return Err(Error::InvalidAmount(format!(
            "more than two decimal places: {amount}"
        )));
    }

    let whole_centavos: u64 = if whole_part.is_empty() {
        0
    } else {
        whole_part
            .parse::<u64>()
            .map_err(|_| Error::InvalidAmount(format!("amount overflow: {amount}")))?
            .checked_mul(100)
            .ok_or_else(|| Error::InvalidAmount(format!("amount overflow: {amount}")))?
    };

    let frac_centavos: u64 = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{frac_part:0<2}");
        padded
            .parse()
            .map_err(|_| Error::InvalidAmount(format!("invalid fractional part: {frac_part:?}")))?
    };

    let centavos = whole_centavos
        .checked_add(frac_centavos)
        .ok_or_else(|| Error::InvalidAmount(format!("amount overflow: {amount}")))?;

    if centavos > MAX_AMOUNT_CENTAVOS {
        return Err(Error::InvalidAmount(format!(
            "amount exceeds 999999999.99: {amount}"
        )));
    }

    Ok(centavos)
}

/// Format centavos as the tag 54 value: no thousands separator, exactly two
/// fractional digits.
pub fn format_amount(centavos: u64) -> String {
    format!("{}.{:02}", centavos / 100, centavos % 100)
}
