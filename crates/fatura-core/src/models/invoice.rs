//! Invoice data models for Brazilian electric-utility bills.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::invoice::rules::Distributor;

/// A labeled kWh line item: quantity paired with its monetary value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySection {
    /// Quantity in kilowatt-hours.
    pub kwh: f64,

    /// Monetary value in BRL. Negative for credits.
    pub value: f64,
}

impl EnergySection {
    pub fn new(kwh: f64, value: f64) -> Self {
        Self { kwh, value }
    }

    /// Both quantity and value are zero.
    pub fn is_zero(&self) -> bool {
        self.kwh == 0.0 && self.value == 0.0
    }
}

/// Fields located in the text of a single invoice.
///
/// Serialized flat, one key per quantity and value
/// (`energiaEletricaKwh`, `energiaEletricaValue`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "FlatInvoiceData", from = "FlatInvoiceData")]
pub struct ExtractedInvoiceData {
    /// Numeric client identifier, 8+ digits.
    pub client_number: String,

    /// Billing period as `MMM/YYYY` (e.g. `SET/2024`).
    pub reference_month: String,

    /// Distributor, when a known name appears in the text.
    pub distributor_name: Option<Distributor>,

    /// Standard grid energy.
    pub energia_eletrica: EnergySection,

    /// Energy under the compensation scheme, before the offset.
    pub energia_sceee: EnergySection,

    /// Energy credited back by distributed generation.
    pub energia_compensada: EnergySection,

    /// Municipal public-lighting contribution.
    pub contrib_ilum_publica: f64,

    /// Damage reimbursement charge.
    pub ressarcimento_danos: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatInvoiceData {
    client_number: String,
    reference_month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distributor_name: Option<Distributor>,
    energia_eletrica_kwh: f64,
    energia_eletrica_value: f64,
    energia_sceee_kwh: f64,
    energia_sceee_value: f64,
    energia_compensada_kwh: f64,
    energia_compensada_value: f64,
    contrib_ilum_publica: f64,
    #[serde(default)]
    ressarcimento_danos: f64,
}

impl From<ExtractedInvoiceData> for FlatInvoiceData {
    fn from(data: ExtractedInvoiceData) -> Self {
        Self {
            client_number: data.client_number,
            reference_month: data.reference_month,
            distributor_name: data.distributor_name,
            energia_eletrica_kwh: data.energia_eletrica.kwh,
            energia_eletrica_value: data.energia_eletrica.value,
            energia_sceee_kwh: data.energia_sceee.kwh,
            energia_sceee_value: data.energia_sceee.value,
            energia_compensada_kwh: data.energia_compensada.kwh,
            energia_compensada_value: data.energia_compensada.value,
            contrib_ilum_publica: data.contrib_ilum_publica,
            ressarcimento_danos: data.ressarcimento_danos,
        }
    }
}

impl From<FlatInvoiceData> for ExtractedInvoiceData {
    fn from(flat: FlatInvoiceData) -> Self {
        Self {
            client_number: flat.client_number,
            reference_month: flat.reference_month,
            distributor_name: flat.distributor_name,
            energia_eletrica: EnergySection::new(
                flat.energia_eletrica_kwh,
                flat.energia_eletrica_value,
            ),
            energia_sceee: EnergySection::new(flat.energia_sceee_kwh, flat.energia_sceee_value),
            energia_compensada: EnergySection::new(
                flat.energia_compensada_kwh,
                flat.energia_compensada_value,
            ),
            contrib_ilum_publica: flat.contrib_ilum_publica,
            ressarcimento_danos: flat.ressarcimento_danos,
        }
    }
}

impl ExtractedInvoiceData {
    /// Create a record holding only the identity fields.
    pub fn new(client_number: impl Into<String>, reference_month: impl Into<String>) -> Self {
        Self {
            client_number: client_number.into(),
            reference_month: reference_month.into(),
            distributor_name: None,
            energia_eletrica: EnergySection::default(),
            energia_sceee: EnergySection::default(),
            energia_compensada: EnergySection::default(),
            contrib_ilum_publica: 0.0,
            ressarcimento_danos: 0.0,
        }
    }
}

/// Totals computed from [`ExtractedInvoiceData`], never read from the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedTotals {
    /// Grid plus compensated-scheme consumption in kWh.
    #[serde(rename = "consumoTotal")]
    pub consumo_total: f64,

    /// Amount payable without the distributed-generation offset.
    #[serde(rename = "valorTotalSemGD")]
    pub valor_total_sem_gd: f64,

    /// Saving from compensation, always non-negative.
    #[serde(rename = "economiaGD")]
    pub economia_gd: f64,
}

/// An extracted invoice together with its derived totals, ready to hand
/// to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(flatten)]
    pub data: ExtractedInvoiceData,

    #[serde(flatten)]
    pub totals: DerivedTotals,

    /// Where the text came from (file name, object key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// When the record was produced.
    pub processed_at: DateTime<Utc>,
}

impl InvoiceRecord {
    pub fn new(data: ExtractedInvoiceData, totals: DerivedTotals) -> Self {
        Self {
            data,
            totals,
            source: None,
            processed_at: Utc::now(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Unique storage key: client number and reference month.
    pub fn key(&self) -> (&str, &str) {
        (&self.data.client_number, &self.data.reference_month)
    }

    /// File stem used when exporting or downloading this record,
    /// e.g. `fatura_7202210726_SET-2024`.
    pub fn file_stem(&self) -> String {
        format!(
            "fatura_{}_{}",
            self.data.client_number,
            self.data.reference_month.replace('/', "-")
        )
    }

    /// Name of the original document when offered for download.
    pub fn download_name(&self) -> String {
        format!("{}.pdf", self.file_stem())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let mut data = ExtractedInvoiceData::new("7202210726", "SET/2024");
        data.distributor_name = Some(Distributor::Cemig);
        let record = InvoiceRecord::new(
            data,
            DerivedTotals {
                consumo_total: 1960.0,
                valor_total_sem_gd: 1233.5,
                economia_gd: 1044.37,
            },
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["clientNumber"], "7202210726");
        assert_eq!(json["referenceMonth"], "SET/2024");
        assert_eq!(json["distributorName"], "CEMIG");
        assert_eq!(json["valorTotalSemGD"], 1233.5);
        assert_eq!(json["economiaGD"], 1044.37);
        assert!(json.get("source").is_none());
    }

    #[test]
    fn test_sections_serialize_flat() {
        let mut data = ExtractedInvoiceData::new("7202210726", "SET/2024");
        data.energia_eletrica = EnergySection::new(100.0, 104.81);
        data.energia_sceee = EnergySection::new(1860.0, 1081.12);
        data.energia_compensada = EnergySection::new(1860.0, -1044.37);
        data.contrib_ilum_publica = 47.57;
        let record = InvoiceRecord::new(data, DerivedTotals::default());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["energiaEletricaKwh"], 100.0);
        assert_eq!(json["energiaEletricaValue"], 104.81);
        assert_eq!(json["energiaSceeeKwh"], 1860.0);
        assert_eq!(json["energiaSceeeValue"], 1081.12);
        assert_eq!(json["energiaCompensadaKwh"], 1860.0);
        assert_eq!(json["energiaCompensadaValue"], -1044.37);
        assert_eq!(json["contribIlumPublica"], 47.57);
        assert!(json.get("energiaEletrica").is_none());

        let back: InvoiceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_download_name() {
        let record = InvoiceRecord::new(
            ExtractedInvoiceData::new("3001116735", "JAN/2024"),
            DerivedTotals::default(),
        );
        assert_eq!(record.key(), ("3001116735", "JAN/2024"));
        assert_eq!(record.download_name(), "fatura_3001116735_JAN-2024.pdf");
    }
}
