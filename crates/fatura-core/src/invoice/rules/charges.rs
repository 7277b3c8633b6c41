//! Single-value charges: public-lighting contribution and damage
//! reimbursement.

use regex::Regex;
use tracing::debug;

use super::numbers::{find_numbers, parse_locale_number};
use super::patterns::{CONTRIB_ILUM_PUBLICA, RESSARCIMENTO_DANOS, SECTION_KEYWORDS};
use super::window::bounded_window;
use super::SectionMatch;

fn first_number_after(label: &Regex, text: &str, max_chars: usize) -> SectionMatch<f64> {
    let Some(found) = label.find(text) else {
        return SectionMatch::missing();
    };

    let window = bounded_window(text, found.start(), max_chars, found.len(), SECTION_KEYWORDS);
    match find_numbers(window).first() {
        Some(raw) => SectionMatch::found(parse_locale_number(raw)),
        None => SectionMatch::unreadable(),
    }
}

/// Municipal public-lighting contribution (COSIP), never negative.
pub fn extract_contrib_ilum_publica(text: &str, max_chars: usize) -> SectionMatch<f64> {
    let mut m = first_number_after(&CONTRIB_ILUM_PUBLICA, text, max_chars);
    m.value = m.value.abs();
    debug!("Contribuição iluminação pública: {} ({:?})", m.value, m.outcome);
    m
}

/// Damage reimbursement charge; zero when the line is absent.
pub fn extract_ressarcimento_danos(text: &str, max_chars: usize) -> SectionMatch<f64> {
    let m = first_number_after(&RESSARCIMENTO_DANOS, text, max_chars);
    debug!("Ressarcimento de danos: {} ({:?})", m.value, m.outcome);
    m
}
