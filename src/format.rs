//! Parsing of user-typed amounts and display formatting for money and percentages.

use serde::{Deserialize, Serialize};

/// Decimal places used when showing a loan-to-value ratio.
pub const LTV_DECIMALS: usize = 1;
/// Decimal places used when showing an ownership stake.
pub const OWNERSHIP_DECIMALS: usize = 1;
/// Decimal places used when showing how much of a property is still available.
pub const AVAILABILITY_DECIMALS: usize = 0;

/// How currency amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub fraction_digits: usize,
    pub group_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            fraction_digits: 0,
            group_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl CurrencyFormat {
    pub fn format(&self, value: f64) -> String {
        self.format_with_digits(value, self.fraction_digits)
    }

    /// Formats with an explicit number of fractional digits, e.g. cents for a
    /// monthly payment while totals stay whole.
    pub fn format_with_digits(&self, value: f64, fraction_digits: usize) -> String {
        let rounded = format!("{:.*}", fraction_digits, value.abs());
        let (whole, fraction) = match rounded.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (rounded.as_str(), None),
        };

        let mut out = String::with_capacity(rounded.len() + self.symbol.len() + 4);
        // "-0" is not a meaningful amount once rounded
        if value < 0.0 && rounded.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            out.push('-');
        }
        out.push_str(&self.symbol);
        out.push_str(&group_thousands(whole, self.group_separator));
        if let Some(fraction) = fraction {
            out.push(self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Formats `value` (already scaled to 0..=100) with a fixed number of decimals.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Parses a money amount the way a user types it: `$`, `,`, `_` and spaces are
/// ignored. Returns `None` for empty or non-numeric input.
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
        .collect();
    parse_finite(&cleaned)
}

/// Like [`parse_amount`] but also tolerates a trailing `%`.
pub fn parse_rate(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    parse_amount(trimmed.strip_suffix('%').unwrap_or(trimmed))
}

fn parse_finite(cleaned: &str) -> Option<f64> {
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Characters accepted while typing into a money field.
pub fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | ',' | '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_formatting() {
        assert_eq!(parse_amount("$500,000"), Some(500_000.0));
        assert_eq!(parse_amount(" 1 250.50 "), Some(1250.5));
        assert_eq!(parse_amount("$"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12a"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn rate_accepts_percent_sign() {
        assert_eq!(parse_rate("3.25%"), Some(3.25));
        assert_eq!(parse_rate("6.5"), Some(6.5));
        assert_eq!(parse_rate("%"), None);
    }

    #[test]
    fn groups_thousands() {
        let usd = CurrencyFormat::default();
        assert_eq!(usd.format(0.0), "$0");
        assert_eq!(usd.format(999.0), "$999");
        assert_eq!(usd.format(1000.0), "$1,000");
        assert_eq!(usd.format(226_698.8), "$226,699");
        assert_eq!(usd.format(1_234_567.0), "$1,234,567");
        assert_eq!(usd.format_with_digits(1740.8302, 2), "$1,740.83");
    }

    #[test]
    fn negative_amounts_keep_sign_unless_rounded_away() {
        let usd = CurrencyFormat::default();
        assert_eq!(usd.format(-2500.0), "-$2,500");
        assert_eq!(usd.format(-0.2), "$0");
    }

    #[test]
    fn custom_separators() {
        let eur = CurrencyFormat {
            symbol: "€".to_string(),
            fraction_digits: 2,
            group_separator: '.',
            decimal_separator: ',',
        };
        assert_eq!(eur.format(1234567.891), "€1.234.567,89");
    }

    #[test]
    fn percent_policies() {
        assert_eq!(format_percent(80.0, LTV_DECIMALS), "80.0%");
        assert_eq!(format_percent(12.345, OWNERSHIP_DECIMALS), "12.3%");
        assert_eq!(format_percent(37.6, AVAILABILITY_DECIMALS), "38%");
    }
}
