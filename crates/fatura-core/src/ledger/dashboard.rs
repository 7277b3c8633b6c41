//! Monthly aggregation of derived invoice totals.

use std::collections::HashMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::invoice::rules::sort_key;
use crate::models::invoice::InvoiceRecord;

/// Sums of the aggregated fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    #[serde(rename = "consumoTotal")]
    pub consumo_total: f64,
    #[serde(rename = "energiaCompensadaKwh")]
    pub energia_compensada_kwh: f64,
    #[serde(rename = "valorTotalSemGD")]
    pub valor_total_sem_gd: f64,
    #[serde(rename = "economiaGD")]
    pub economia_gd: f64,
}

impl AddAssign<&InvoiceRecord> for MonthlyTotals {
    fn add_assign(&mut self, record: &InvoiceRecord) {
        self.consumo_total += record.totals.consumo_total;
        self.energia_compensada_kwh += record.data.energia_compensada.kwh;
        self.valor_total_sem_gd += record.totals.valor_total_sem_gd;
        self.economia_gd += record.totals.economia_gd;
    }
}

/// Totals for one reference month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: String,
    #[serde(flatten)]
    pub totals: MonthlyTotals,
}

/// Grand totals plus a per-month time series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub totals: MonthlyTotals,
    /// One entry per reference month, oldest first.
    pub time_series: Vec<MonthSummary>,
}

impl Dashboard {
    /// Group records by reference month and sum them.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a InvoiceRecord>) -> Self {
        let mut totals = MonthlyTotals::default();
        let mut by_month: HashMap<&str, MonthlyTotals> = HashMap::new();

        for record in records {
            totals += record;
            *by_month.entry(record.data.reference_month.as_str()).or_default() += record;
        }

        let mut time_series: Vec<MonthSummary> = by_month
            .into_iter()
            .map(|(month, totals)| MonthSummary {
                month: month.to_string(),
                totals,
            })
            .collect();
        time_series.sort_by(|a, b| {
            sort_key(&a.month)
                .cmp(&sort_key(&b.month))
                .then_with(|| a.month.cmp(&b.month))
        });

        Self {
            totals,
            time_series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::record;
    use crate::ledger::{InvoiceLedger, InvoiceQuery};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dashboard_groups_by_month() {
        let ledger: InvoiceLedger = vec![
            record("7202210726", "FEV/2024", 100.0, 10.0),
            record("3001116735", "FEV/2024", 50.0, 5.0),
            record("7202210726", "DEZ/2023", 80.0, 8.0),
            record("7202210726", "JAN/2024", 60.0, 6.0),
        ]
        .into_iter()
        .collect();

        let dashboard = ledger.dashboard(&InvoiceQuery::new());

        let months: Vec<&str> = dashboard.time_series.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["DEZ/2023", "JAN/2024", "FEV/2024"]);

        let fev = &dashboard.time_series[2].totals;
        assert_eq!(fev.consumo_total, 150.0);
        assert_eq!(fev.energia_compensada_kwh, 75.0);
        assert_eq!(fev.valor_total_sem_gd, 75.0);
        assert_eq!(fev.economia_gd, 15.0);

        assert_eq!(dashboard.totals.consumo_total, 290.0);
        assert_eq!(dashboard.totals.economia_gd, 29.0);
    }

    #[test]
    fn test_dashboard_respects_query() {
        let ledger: InvoiceLedger = vec![
            record("7202210726", "FEV/2024", 100.0, 10.0),
            record("3001116735", "FEV/2024", 50.0, 5.0),
        ]
        .into_iter()
        .collect();

        let dashboard = ledger.dashboard(&InvoiceQuery::new().client("3001116735"));
        assert_eq!(dashboard.time_series.len(), 1);
        assert_eq!(dashboard.totals.consumo_total, 50.0);
    }

    #[test]
    fn test_empty_dashboard() {
        let dashboard = Dashboard::from_records(Vec::<&InvoiceRecord>::new());
        assert_eq!(dashboard, Dashboard::default());
    }

    #[test]
    fn test_serialized_shape() {
        let ledger: InvoiceLedger = vec![record("7202210726", "FEV/2024", 100.0, 10.0)]
            .into_iter()
            .collect();
        let json = serde_json::to_value(ledger.dashboard(&InvoiceQuery::new())).unwrap();

        assert_eq!(json["timeSeries"][0]["month"], "FEV/2024");
        assert_eq!(json["timeSeries"][0]["consumoTotal"], 100.0);
        assert_eq!(json["totals"]["economiaGD"], 10.0);
    }
}
