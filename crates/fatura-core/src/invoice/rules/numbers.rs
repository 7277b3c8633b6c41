//! Brazilian-locale number handling (`1.860,00`, `-1.044,37`).

use super::patterns::{FLOAT_PREFIX, LOCALE_NUMBER};

/// Parse a Brazilian-formatted number.
///
/// `.` is a thousands separator and `,` the decimal separator. Whitespace is
/// ignored. Only the leading numeric part is read, so trailing units or a
/// second comma are dropped (`"104,81 kWh"` is 104.81, `"1,2,3"` is 1.2).
/// Input without a leading number yields `0.0`.
pub fn parse_locale_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    let normalized = cleaned.replacen(',', ".", 1);

    FLOAT_PREFIX
        .find(&normalized)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// All numeric-looking substrings of `text`, left to right.
pub fn find_numbers(text: &str) -> Vec<&str> {
    LOCALE_NUMBER.find_iter(text).map(|m| m.as_str()).collect()
}

/// Format a value in Brazilian style with two decimals (1.234,56).
pub fn format_brl(value: f64) -> String {
    let s = format!("{:.2}", value.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if value < 0.0 && s != "0.00" {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}
