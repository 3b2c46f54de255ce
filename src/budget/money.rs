//! Localized monetary text handling.
//!
//! Amounts are entered and displayed the way the household writes them:
//! thousands separated with `.`, decimals with `,`, an optional `$` prefix
//! (e.g. `$1.234,50`). Everything past the input boundary works on plain
//! `Decimal` values.

use std::str::FromStr;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount for {field}: {raw:?}")]
pub struct AmountError {
    pub field: &'static str,
    pub raw: String,
}

/// Normalizes localized monetary text to a decimal: strips the currency
/// prefix and any other noise, drops thousands separators, and swaps the
/// decimal comma for a period.
pub fn normalize(field: &'static str, raw: &str) -> Result<Decimal, AmountError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    let plain = cleaned.replace('.', "").replace(',', ".");

    Decimal::from_str(&plain).map_err(|_| AmountError {
        field,
        raw: raw.to_string(),
    })
}

/// Normalizes and requires a strictly positive amount. Expense amounts must
/// be greater than zero; only the income scalar may legally be zero.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, AmountError> {
    let value = normalize(field, raw)?;
    if value <= Decimal::ZERO {
        return Err(AmountError {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value)
}

/// Formats a decimal as localized currency text, rounded to two places:
/// `1234.5` becomes `$1.234,50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped},{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn normalizes_localized_input() {
        assert_eq!(normalize("amount", "$1.234,50").unwrap(), dec("1234.50"));
        assert_eq!(normalize("amount", "1.234,50").unwrap(), dec("1234.50"));
        assert_eq!(normalize("amount", "500").unwrap(), dec("500"));
        assert_eq!(normalize("amount", "0,99").unwrap(), dec("0.99"));
        assert_eq!(normalize("income", "0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn rejects_garbage_and_names_the_field() {
        let err = normalize("monto", "abc").unwrap_err();
        assert_eq!(err.field, "monto");
        assert!(err.to_string().contains("monto"));
    }

    #[test]
    fn parse_amount_requires_positive_values() {
        assert!(parse_amount("amount", "0").is_err());
        assert!(parse_amount("amount", "-12,50").is_err());
        assert_eq!(parse_amount("amount", "$12,50").unwrap(), dec("12.50"));
    }

    #[test]
    fn formats_with_grouping_and_decimal_comma() {
        assert_eq!(format_currency(dec("1234.5")), "$1.234,50");
        assert_eq!(format_currency(dec("0")), "$0,00");
        assert_eq!(format_currency(dec("1000000")), "$1.000.000,00");
        assert_eq!(format_currency(dec("-42.129")), "-$42,13");
    }

    #[test]
    fn format_then_normalize_round_trips() {
        for raw in ["1234.5", "0.01", "999999.99", "7"] {
            let value = dec(raw);
            let round_tripped = normalize("amount", &format_currency(value)).unwrap();
            assert_eq!(round_tripped, value.round_dp(2));
        }
    }
}
