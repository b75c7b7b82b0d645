//! Currency display formatting.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary amounts are `rust_decimal::Decimal`; this module only
//! formats them for display (es-AR convention: `$ 1.234,56`).

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a monetary amount with the currency symbol.
///
/// Amounts are rounded to two decimal places, thousands are grouped with
/// `.` and the decimal separator is `,`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("$ {}", format_amount(amount))
}

/// Formats a monetary amount without the currency symbol.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();

    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), format!("{f:0<2}")),
        None => (text, "00".to_string()),
    };

    let grouped = group_thousands(&integer);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{fraction}")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "0,00")]
    #[case(dec!(5), "5,00")]
    #[case(dec!(1234.5), "1.234,50")]
    #[case(dec!(1234567.89), "1.234.567,89")]
    #[case(dec!(100), "100,00")]
    #[case(dec!(1000), "1.000,00")]
    #[case(dec!(-9876.54), "-9.876,54")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_format_currency_prefix() {
        assert_eq!(format_currency(dec!(1500)), "$ 1.500,00");
    }

    #[test]
    fn test_rounding_to_two_places() {
        assert_eq!(format_amount(dec!(10.005)), "10,01");
        assert_eq!(format_amount(dec!(10.004)), "10,00");
    }
}
