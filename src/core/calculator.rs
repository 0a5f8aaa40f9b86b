//! Pure conversion arithmetic over the current rate state.

use crate::core::error::ConverterError;
use crate::core::state::RateState;
use crate::core::surface::SelectOption;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Value of the selected option, or an empty string when none is selected.
pub fn selected_currency(options: &[SelectOption]) -> Result<String, ConverterError> {
    let mut selected = options.iter().filter(|o| o.selected).map(|o| &o.value);
    match (selected.next(), selected.next()) {
        (None, _) => Ok(String::new()),
        (Some(value), None) => Ok(value.clone()),
        (Some(first), Some(second)) => {
            let mut values = vec![first.clone(), second.clone()];
            values.extend(selected.cloned());
            Err(ConverterError::AmbiguousSelection(values))
        }
    }
}

/// Digit separators are not numbers. Values too small for 28 decimal places
/// round towards zero instead of failing.
fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.contains('_') {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .or_else(|| parse_tiny_scientific(text))
}

fn parse_tiny_scientific(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = text.split_once(['e', 'E'])?;
    let mut value = Decimal::from_str(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    if exponent >= 0 {
        return None;
    }
    // Past 60 divisions any mantissa has rounded away.
    for _ in 0..exponent.unsigned_abs().min(60) {
        value /= Decimal::TEN;
    }
    Some(value)
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn rate_text<'a>(state: &'a RateState, code: &str) -> Result<&'a str, ConverterError> {
    state
        .get()
        .rates()
        .and_then(|rates| rates.get(code))
        .ok_or_else(|| ConverterError::MissingRate(code.to_string()))
}

/// Rate of `code` relative to the current base currency.
pub fn multiplier(state: &RateState, code: &str) -> Result<Decimal, ConverterError> {
    let text = rate_text(state, code)?;
    parse_number(text).ok_or_else(|| ConverterError::InvalidRate {
        code: code.to_string(),
        value: text.to_string(),
    })
}

/// Rate of `code` as sent by the provider, or with exactly two decimals when `fixed`.
pub fn convert_currency(
    state: &RateState,
    code: &str,
    fixed: bool,
) -> Result<String, ConverterError> {
    if fixed {
        Ok(format!("{:.2}", round2(multiplier(state, code)?)))
    } else {
        rate_text(state, code).map(str::to_string)
    }
}

/// Converted amount for a typed input, or `None` when the input is empty.
///
/// The multiplier is rounded to two decimals before multiplying, and the
/// product is printed without trailing zeros.
pub fn converted_value(
    input: &str,
    multiplier: Decimal,
) -> Result<Option<String>, ConverterError> {
    if input.is_empty() {
        return Ok(None);
    }
    let amount = if input.trim().is_empty() {
        Decimal::ZERO
    } else {
        parse_number(input).ok_or_else(|| ConverterError::InvalidAmount(input.to_string()))?
    };
    let product = amount
        .checked_mul(round2(multiplier))
        .ok_or_else(|| ConverterError::InvalidAmount(input.to_string()))?;
    Ok(Some(product.normalize().to_string()))
}

/// Human readable "1 X = Y Z" text.
pub fn unit_rate_text(from: &str, rate: &str, to: &str) -> String {
    format!("1 {from} = {rate} {to}")
}
