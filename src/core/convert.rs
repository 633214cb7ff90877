//! Conversion of the base amount into any other tracked currency.

use lazy_static::lazy_static;
use regex::Regex;

use super::rates::ExchangeRateTable;

/// Shown for any row whose rate is unknown.
pub const ZERO_AMOUNT: &str = "0.00";

lazy_static! {
    /// Longest leading decimal number, e.g. `12.5` out of `" 12.5abc"`.
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("Invalid regex pattern");
}

/// Reads the numeric prefix of user input, `0.0` when there is none.
pub fn parse_amount(text: &str) -> f64 {
    LEADING_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Converts `base_amount` (raw text in `base_code`) into `target_code`.
///
/// The base row gets back exactly what was typed. Missing rates give
/// [`ZERO_AMOUNT`]; everything else goes through the reference currency
/// and is printed with two fixed decimals.
pub fn convert(
    rates: &ExchangeRateTable,
    base_code: &str,
    base_amount: &str,
    target_code: &str,
) -> String {
    if target_code == base_code {
        return base_amount.to_string();
    }

    let (Some(base_rate), Some(target_rate)) = (rates.get(base_code), rates.get(target_code))
    else {
        return ZERO_AMOUNT.to_string();
    };

    let reference_value = parse_amount(base_amount) / base_rate;
    let target_value = reference_value * target_rate;

    let formatted = format!("{target_value:.2}");
    // -0.001 and -0.0 both print with a sign
    if formatted.trim_start_matches('-') == ZERO_AMOUNT {
        return ZERO_AMOUNT.to_string();
    }
    formatted
}
