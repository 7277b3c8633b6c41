//! Energy section extraction (quantity in kWh and monetary value).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use super::numbers::{find_numbers, parse_locale_number};
use super::patterns::{ENERGIA_COMPENSADA, ENERGIA_ELETRICA, ENERGIA_SCEEE, SECTION_KEYWORDS};
use super::window::bounded_window;
use super::SectionMatch;
use crate::models::invoice::EnergySection;

/// The three kWh sections of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyKind {
    /// Standard grid energy.
    Eletrica,
    /// Energy under the compensation scheme, before the offset.
    Sceee,
    /// Energy credited by distributed generation.
    Compensada,
}

impl EnergyKind {
    fn label(&self) -> &'static Regex {
        match self {
            EnergyKind::Eletrica => &*ENERGIA_ELETRICA,
            EnergyKind::Sceee => &*ENERGIA_SCEEE,
            EnergyKind::Compensada => &*ENERGIA_COMPENSADA,
        }
    }
}

impl fmt::Display for EnergyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EnergyKind::Eletrica => "energia elétrica",
            EnergyKind::Sceee => "energia SCEEE",
            EnergyKind::Compensada => "energia compensada",
        })
    }
}

/// Locate a section and read its quantity and value.
///
/// At most `max_chars` characters after the label are read, stopping at the
/// next section keyword. With two numbers the first is the quantity and the
/// second the value; with three or more the second (unit price) is skipped
/// and the third is the value. A missing label or fewer than two numbers
/// yields zeros.
pub fn extract_energy_section(
    text: &str,
    kind: EnergyKind,
    max_chars: usize,
) -> SectionMatch<EnergySection> {
    let Some(label) = kind.label().find(text) else {
        debug!("No {} section", kind);
        return SectionMatch::missing();
    };

    let window = bounded_window(
        text,
        label.start(),
        max_chars,
        label.len(),
        SECTION_KEYWORDS,
    );
    let numbers = find_numbers(window);
    trace!("{} window {:?} -> {:?}", kind, window, numbers);

    match select_quantity_and_value(&numbers) {
        Some(section) => {
            debug!("{}: {} kWh, value {}", kind, section.kwh, section.value);
            SectionMatch::found(section)
        }
        None => SectionMatch::unreadable(),
    }
}

fn select_quantity_and_value(numbers: &[&str]) -> Option<EnergySection> {
    let (quantity, value) = match numbers {
        [quantity, value] => (quantity, value),
        [quantity, _unit_price, value, ..] => (quantity, value),
        _ => return None,
    };

    Some(EnergySection::new(
        parse_locale_number(quantity).abs(),
        parse_locale_number(value),
    ))
}
