//! Amount parsing and rendering under the display settings.

use ledger_core::{CoreResult, Decimal, DecimalError};

/// Parses a whole argument as an amount.
///
/// With `scale` set the amount is held at exactly that many fractional
/// digits (extra digits truncated toward zero).
pub fn parse_amount(text: &str, scale: Option<usize>) -> CoreResult<Decimal> {
    let mut amount = Decimal::new();
    if let Some(scale) = scale {
        amount.configure(scale, scale)?;
    }
    let consumed = amount.set_text(text)?;
    if consumed != text.len() {
        return Err(DecimalError::TrailingCharacters { position: consumed }.into());
    }
    Ok(amount)
}

/// Renders `value`, rescaled to `scale` fractional digits when one is set.
pub fn render_amount(value: &Decimal, scale: Option<usize>, force_sign: bool) -> CoreResult<String> {
    match scale {
        None => Ok(value.to_text(force_sign)),
        Some(_) => Ok(parse_amount(&value.to_text(false), scale)?.to_text(force_sign)),
    }
}
