//! Reference period (billing month) extraction and normalization.

use tracing::debug;

use super::patterns::{MONTH_ABBR_YEAR, MONTH_NUMERIC_YEAR};
use super::{first_match, Rule};

/// Portuguese month abbreviations, January first.
pub const MONTHS: [&str; 12] = [
    "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
];

pub const REFERENCE_MONTH_RULES: &[Rule] = &[
    Rule::new("month_abbreviation", abbreviated),
    Rule::new("month_numeric", numeric),
];

fn abbreviated(text: &str) -> Option<String> {
    let caps = MONTH_ABBR_YEAR.captures(text)?;
    Some(format!("{}/{}", caps[1].to_uppercase(), &caps[2]))
}

fn numeric(text: &str) -> Option<String> {
    let caps = MONTH_NUMERIC_YEAR.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    Some(format!("{}/{}", month_abbreviation(month)?, &caps[2]))
}

/// Extract the reference month as `MMM/YYYY`.
///
/// `SET/2024` and `set / 2024` give `SET/2024`; `09/2024` is mapped to
/// `SET/2024`.
pub fn extract_reference_month(text: &str) -> Option<String> {
    let found = first_match(REFERENCE_MONTH_RULES, text)?;
    debug!("Reference month {} matched by {}", found.value, found.rule);
    Some(found.value)
}

/// Abbreviation for a month number (1-12).
pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// Month number (1-12) for an abbreviation, case-insensitive.
pub fn month_number(abbreviation: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbreviation))
        .map(|i| i as u32 + 1)
}

/// `(year, month)` for a canonical `MMM/YYYY` value, for chronological
/// ordering.
pub fn sort_key(reference_month: &str) -> Option<(u32, u32)> {
    let (month, year) = reference_month.split_once('/')?;
    Some((year.parse().ok()?, month_number(month)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviated_month_passes_through() {
        assert_eq!(
            extract_reference_month("Referente a SET/2024"),
            Some("SET/2024".to_string())
        );
        assert_eq!(
            extract_reference_month("referente a out / 2023"),
            Some("OUT/2023".to_string())
        );
    }

    #[test]
    fn test_numeric_month_is_mapped() {
        assert_eq!(
            extract_reference_month("Mês de referência 09/2024"),
            Some("SET/2024".to_string())
        );
        assert_eq!(
            extract_reference_month("Vencimento 15/12/2023"),
            Some("DEZ/2023".to_string())
        );
    }

    #[test]
    fn test_abbreviation_preferred_over_numeric() {
        assert_eq!(
            extract_reference_month("Emissão 03/2024 Referente a FEV/2024"),
            Some("FEV/2024".to_string())
        );
    }

    #[test]
    fn test_invalid_numeric_month_rejected() {
        assert_eq!(extract_reference_month("lote 13/2024"), None);
        assert_eq!(extract_reference_month("sem período"), None);
    }

    #[test]
    fn test_month_table() {
        assert_eq!(month_abbreviation(1), Some("JAN"));
        assert_eq!(month_abbreviation(12), Some("DEZ"));
        assert_eq!(month_abbreviation(0), None);
        assert_eq!(month_abbreviation(13), None);
        assert_eq!(month_number("set"), Some(9));
        assert_eq!(month_number("XYZ"), None);
    }

    #[test]
    fn test_sort_key() {
        assert_eq!(sort_key("SET/2024"), Some((2024, 9)));
        assert!(sort_key("DEZ/2023") < sort_key("JAN/2024"));
        assert_eq!(sort_key("2024"), None);
    }
}
