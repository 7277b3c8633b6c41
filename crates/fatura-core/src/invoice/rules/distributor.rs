//! Distributor (utility company) detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known electricity distributors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Distributor {
    Cemig,
    Cpfl,
    Energisa,
    Enel,
    Edp,
    Light,
}

impl Distributor {
    /// All distributors in match priority order.
    pub const ALL: [Distributor; 6] = [
        Distributor::Cemig,
        Distributor::Cpfl,
        Distributor::Energisa,
        Distributor::Enel,
        Distributor::Edp,
        Distributor::Light,
    ];

    /// Name as printed on invoices.
    pub fn as_str(&self) -> &'static str {
        match self {
            Distributor::Cemig => "CEMIG",
            Distributor::Cpfl => "CPFL",
            Distributor::Energisa => "ENERGISA",
            Distributor::Enel => "ENEL",
            Distributor::Edp => "EDP",
            Distributor::Light => "LIGHT",
        }
    }
}

impl fmt::Display for Distributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First known distributor whose name occurs in the text, case-insensitive.
pub fn extract_distributor(text: &str) -> Option<Distributor> {
    let upper = text.to_uppercase();
    Distributor::ALL
        .into_iter()
        .find(|d| upper.contains(d.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_distributor() {
        assert_eq!(
            extract_distributor("CEMIG DISTRIBUIÇÃO S.A."),
            Some(Distributor::Cemig)
        );
        assert_eq!(extract_distributor("Enel Distribuição Rio"), Some(Distributor::Enel));
        assert_eq!(extract_distributor("Cooperativa local"), None);
    }

    #[test]
    fn test_list_order_wins() {
        // Both present; CEMIG comes first in the list
        assert_eq!(
            extract_distributor("Light Serviços ... cemig"),
            Some(Distributor::Cemig)
        );
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Distributor::Energisa).unwrap(), "\"ENERGISA\"");
        let d: Distributor = serde_json::from_str("\"EDP\"").unwrap();
        assert_eq!(d, Distributor::Edp);
    }
}
