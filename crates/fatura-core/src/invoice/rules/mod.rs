//! Rule-based field extractors for Brazilian utility invoices.

pub mod charges;
pub mod client;
pub mod distributor;
pub mod energy;
pub mod numbers;
pub mod patterns;
pub mod reference;
pub mod window;

pub use charges::{extract_contrib_ilum_publica, extract_ressarcimento_danos};
pub use client::extract_client_number;
pub use distributor::{extract_distributor, Distributor};
pub use energy::{extract_energy_section, EnergyKind};
pub use numbers::{find_numbers, format_brl, parse_locale_number};
pub use reference::{extract_reference_month, month_abbreviation, month_number, sort_key};
pub use window::bounded_window;

/// A named matcher tried as part of an ordered fallback list.
pub struct Rule {
    /// Identifies the rule in logs.
    pub name: &'static str,
    /// Returns the extracted value when the rule applies.
    pub matcher: fn(&str) -> Option<String>,
}

impl Rule {
    pub const fn new(name: &'static str, matcher: fn(&str) -> Option<String>) -> Self {
        Self { name, matcher }
    }
}

/// Value produced by the first rule that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub value: String,
    pub rule: &'static str,
}

/// Evaluate `rules` in order and return the first match.
///
/// Rules after the first match are never evaluated.
pub fn first_match(rules: &[Rule], text: &str) -> Option<RuleMatch> {
    rules.iter().find_map(|rule| {
        (rule.matcher)(text).map(|value| RuleMatch {
            value,
            rule: rule.name,
        })
    })
}

/// Whether a section was found and readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionOutcome {
    /// Label and numbers located.
    Found,
    /// Label not present in the text.
    Missing,
    /// Label present but its numbers could not be read.
    Unreadable,
}

/// Extracted value together with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionMatch<T> {
    pub value: T,
    pub outcome: SectionOutcome,
}

impl<T: Default> SectionMatch<T> {
    pub fn found(value: T) -> Self {
        Self {
            value,
            outcome: SectionOutcome::Found,
        }
    }

    pub fn missing() -> Self {
        Self {
            value: T::default(),
            outcome: SectionOutcome::Missing,
        }
    }

    pub fn unreadable() -> Self {
        Self {
            value: T::default(),
            outcome: SectionOutcome::Unreadable,
        }
    }
}
