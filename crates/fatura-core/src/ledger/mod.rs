//! In-memory invoice record set.
//!
//! Records are unique per client number and reference month; storing the
//! same pair again replaces the earlier record.

mod dashboard;

pub use dashboard::{Dashboard, MonthSummary, MonthlyTotals};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::invoice::rules::sort_key;
use crate::models::invoice::InvoiceRecord;

/// Filters for listing and aggregating records. Empty fields match all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceQuery {
    /// Exact client number.
    pub client_number: Option<String>,
    /// Four-digit year, matched as the suffix of the reference month.
    pub year: Option<String>,
    /// Month abbreviation or fragment, matched as a substring.
    pub month: Option<String>,
}

impl InvoiceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client_number: impl Into<String>) -> Self {
        self.client_number = Some(client_number.into());
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    /// Whether a record passes every filter set on this query.
    pub fn matches(&self, record: &InvoiceRecord) -> bool {
        let data = &record.data;

        if let Some(client) = &self.client_number {
            if &data.client_number != client {
                return false;
            }
        }
        if let Some(year) = &self.year {
            if !data.reference_month.ends_with(&format!("/{}", year)) {
                return false;
            }
        }
        if let Some(month) = &self.month {
            if !data.reference_month.contains(&month.to_uppercase()) {
                return false;
            }
        }
        true
    }
}

/// Invoice records keyed by `(client number, reference month)`.
#[derive(Debug, Clone, Default)]
pub struct InvoiceLedger {
    records: BTreeMap<(String, String), InvoiceRecord>,
}

impl InvoiceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record. Returns `true` when a record with the
    /// same client and month was replaced.
    pub fn upsert(&mut self, record: InvoiceRecord) -> bool {
        let key = (
            record.data.client_number.clone(),
            record.data.reference_month.clone(),
        );
        let replaced = self.records.insert(key, record).is_some();
        if replaced {
            debug!("Replaced existing record");
        }
        replaced
    }

    /// Record for a client and month.
    pub fn get(&self, client_number: &str, reference_month: &str) -> Option<&InvoiceRecord> {
        self.records
            .get(&(client_number.to_string(), reference_month.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matching records, most recent period first, then by client number.
    pub fn list(&self, query: &InvoiceQuery) -> Vec<&InvoiceRecord> {
        let mut records: Vec<&InvoiceRecord> = self
            .records
            .values()
            .filter(|r| query.matches(r))
            .collect();

        records.sort_by(|a, b| {
            sort_key(&b.data.reference_month)
                .cmp(&sort_key(&a.data.reference_month))
                .then_with(|| a.data.client_number.cmp(&b.data.client_number))
        });
        records
    }

    /// Distinct client numbers, ascending.
    pub fn clients(&self) -> Vec<&str> {
        let mut clients: Vec<&str> = self
            .records
            .keys()
            .map(|(client, _)| client.as_str())
            .collect();
        clients.dedup();
        clients
    }

    /// Monthly and overall totals of the matching records.
    pub fn dashboard(&self, query: &InvoiceQuery) -> Dashboard {
        Dashboard::from_records(self.list(query))
    }
}

impl Extend<InvoiceRecord> for InvoiceLedger {
    fn extend<T: IntoIterator<Item = InvoiceRecord>>(&mut self, iter: T) {
        for record in iter {
            self.upsert(record);
        }
    }
}

impl FromIterator<InvoiceRecord> for InvoiceLedger {
    fn from_iter<T: IntoIterator<Item = InvoiceRecord>>(iter: T) -> Self {
        let mut ledger = Self::new();
        ledger.extend(iter);
        ledger
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::invoice::{DerivedTotals, EnergySection, ExtractedInvoiceData};
    use pretty_assertions::assert_eq;

    pub(crate) fn record(client: &str, month: &str, consumo: f64, economia: f64) -> InvoiceRecord {
        let mut data = ExtractedInvoiceData::new(client, month);
        data.energia_compensada = EnergySection::new(consumo / 2.0, -economia);
        InvoiceRecord::new(
            data,
            DerivedTotals {
                consumo_total: consumo,
                valor_total_sem_gd: consumo * 0.5,
                economia_gd: economia,
            },
        )
    }

    fn months(records: &[&InvoiceRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| format!("{} {}", r.data.client_number, r.data.reference_month))
            .collect()
    }

    #[test]
    fn test_upsert_replaces_same_key() {
        let mut ledger = InvoiceLedger::new();
        assert!(!ledger.upsert(record("7202210726", "SET/2024", 100.0, 10.0)));
        assert!(ledger.upsert(record("7202210726", "SET/2024", 200.0, 20.0)));
        assert!(!ledger.upsert(record("7202210726", "OUT/2024", 300.0, 30.0)));

        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.get("7202210726", "SET/2024").unwrap().totals.consumo_total,
            200.0
        );
    }

    #[test]
    fn test_list_order_and_filters() {
        let ledger: InvoiceLedger = vec![
            record("3001116735", "JAN/2024", 1.0, 0.0),
            record("7202210726", "DEZ/2023", 1.0, 0.0),
            record("7202210726", "JAN/2024", 1.0, 0.0),
            record("7202210726", "FEV/2024", 1.0, 0.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            months(&ledger.list(&InvoiceQuery::new())),
            vec![
                "7202210726 FEV/2024",
                "3001116735 JAN/2024",
                "7202210726 JAN/2024",
                "7202210726 DEZ/2023",
            ]
        );

        assert_eq!(
            months(&ledger.list(&InvoiceQuery::new().client("7202210726").year("2024"))),
            vec!["7202210726 FEV/2024", "7202210726 JAN/2024"]
        );

        assert_eq!(
            months(&ledger.list(&InvoiceQuery::new().month("jan"))),
            vec!["3001116735 JAN/2024", "7202210726 JAN/2024"]
        );

        assert!(ledger.list(&InvoiceQuery::new().year("2022")).is_empty());
    }

    #[test]
    fn test_clients_are_distinct() {
        let ledger: InvoiceLedger = vec![
            record("7202210726", "JAN/2024", 1.0, 0.0),
            record("3001116735", "JAN/2024", 1.0, 0.0),
            record("7202210726", "FEV/2024", 1.0, 0.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(ledger.clients(), vec!["3001116735", "7202210726"]);
    }
}
