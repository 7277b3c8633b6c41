//! Rule-based parser for Brazilian electric-utility invoices.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, SectionWindows};
use crate::models::invoice::{DerivedTotals, EnergySection, ExtractedInvoiceData, InvoiceRecord};

use super::derive::derive;
use super::rules::{
    extract_client_number, extract_contrib_ilum_publica, extract_distributor,
    extract_energy_section, extract_reference_month, extract_ressarcimento_danos, EnergyKind,
    SectionMatch, SectionOutcome,
};
use super::Result;

/// Best-effort field of an invoice, for reporting soft failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftField {
    Energy(EnergyKind),
    ContribIlumPublica,
    RessarcimentoDanos,
}

impl fmt::Display for SoftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftField::Energy(kind) => fmt::Display::fmt(kind, f),
            SoftField::ContribIlumPublica => f.write_str("contribuição iluminação pública"),
            SoftField::RessarcimentoDanos => f.write_str("ressarcimento de danos"),
        }
    }
}

/// Non-fatal extraction findings. The affected values are zero or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// The section label does not appear in the text.
    SectionMissing(SoftField),
    /// The label appears but no usable numbers follow it.
    SectionUnreadable(SoftField),
    /// No known distributor name appears in the text.
    DistributorUnknown,
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::SectionMissing(field) => write!(f, "{} not found", field),
            ExtractionWarning::SectionUnreadable(field) => {
                write!(f, "{} found but could not be read", field)
            }
            ExtractionWarning::DistributorUnknown => f.write_str("distributor not recognized"),
        }
    }
}

/// Result of invoice extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted invoice fields.
    pub data: ExtractedInvoiceData,
    /// Totals derived from `data`.
    pub totals: DerivedTotals,
    /// Soft failures, in field order.
    pub warnings: Vec<ExtractionWarning>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// None of the energy sections could be read, so the record carries no
    /// consumption data and is worth a manual look.
    pub fn needs_review(&self) -> bool {
        [
            &self.data.energia_eletrica,
            &self.data.energia_sceee,
            &self.data.energia_compensada,
        ]
        .iter()
        .all(|section| section.is_zero())
    }

    /// Convert into a storable record.
    pub fn into_record(self) -> InvoiceRecord {
        InvoiceRecord::new(self.data, self.totals)
    }
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Invoice parser driven by ordered pattern rules and bounded windows.
///
/// Holds only configuration; every call is independent, so one parser can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct EnergyInvoiceParser {
    /// Minimum document length in characters.
    min_text_length: usize,
    /// Characters read after each section label.
    windows: SectionWindows,
}

impl EnergyInvoiceParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
            windows: config.windows,
        }
    }

    /// Set the minimum document length.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    /// Set the section windows.
    pub fn with_windows(mut self, windows: SectionWindows) -> Self {
        self.windows = windows;
        self
    }

    fn check_length(&self, text: &str) -> Result<()> {
        let length = text.trim().chars().count();
        if length == 0 || length < self.min_text_length {
            debug!("Document has {} characters, need {}", length, self.min_text_length);
            return Err(ExtractionError::EmptyDocument);
        }
        Ok(())
    }

    fn energy(
        &self,
        text: &str,
        kind: EnergyKind,
        warnings: &mut Vec<ExtractionWarning>,
    ) -> EnergySection {
        let max_chars = match kind {
            EnergyKind::Eletrica => self.windows.energia_eletrica,
            EnergyKind::Sceee => self.windows.energia_sceee,
            EnergyKind::Compensada => self.windows.energia_compensada,
        };
        record(extract_energy_section(text, kind, max_chars), SoftField::Energy(kind), warnings)
    }
}

fn record<T>(m: SectionMatch<T>, field: SoftField, warnings: &mut Vec<ExtractionWarning>) -> T {
    match m.outcome {
        SectionOutcome::Found => {}
        SectionOutcome::Missing => warnings.push(ExtractionWarning::SectionMissing(field)),
        SectionOutcome::Unreadable => warnings.push(ExtractionWarning::SectionUnreadable(field)),
    }
    m.value
}

impl Default for EnergyInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for EnergyInvoiceParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!("Parsing invoice from {} characters of text", text.chars().count());

        self.check_length(text)?;

        // Identity fields are mandatory; stop at the first one missing
        let client_number =
            extract_client_number(text).ok_or(ExtractionError::ClientNumberNotFound)?;
        let reference_month =
            extract_reference_month(text).ok_or(ExtractionError::ReferenceMonthNotFound)?;

        let mut warnings = Vec::new();

        let distributor_name = extract_distributor(text);
        if distributor_name.is_none() {
            warnings.push(ExtractionWarning::DistributorUnknown);
        }

        let energia_eletrica = self.energy(text, EnergyKind::Eletrica, &mut warnings);
        let energia_sceee = self.energy(text, EnergyKind::Sceee, &mut warnings);
        let energia_compensada = self.energy(text, EnergyKind::Compensada, &mut warnings);

        let contrib_ilum_publica = record(
            extract_contrib_ilum_publica(text, self.windows.contrib_ilum_publica),
            SoftField::ContribIlumPublica,
            &mut warnings,
        );

        // An absent reimbursement line is the normal case, not a warning
        let ressarcimento = extract_ressarcimento_danos(text, self.windows.ressarcimento_danos);
        if ressarcimento.outcome == SectionOutcome::Unreadable {
            warnings.push(ExtractionWarning::SectionUnreadable(SoftField::RessarcimentoDanos));
        }

        let data = ExtractedInvoiceData {
            client_number,
            reference_month,
            distributor_name,
            energia_eletrica,
            energia_sceee,
            energia_compensada,
            contrib_ilum_publica,
            ressarcimento_danos: ressarcimento.value,
        };
        let totals = derive(&data);

        debug!(
            "Extracted invoice {} {} with {} warnings",
            data.client_number,
            data.reference_month,
            warnings.len()
        );

        Ok(ExtractionResult {
            data,
            totals,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::Distributor;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "
        Nº DO CLIENTE 7202210726
        Referente a SET/2024
        Energia Elétrica kWh 100 1,04841351 104,81
        Energia SCEEE s/ ICMS kWh 1.860 0,58125187 1.081,12
        Energia compensada GD I kWh 1.860 0,56148931 -1.044,37
        Contrib Ilum Publica Municipal 47,57
    ";

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_parse_full_invoice() {
        let result = EnergyInvoiceParser::new().parse(SAMPLE).unwrap();
        let data = &result.data;

        assert_eq!(data.client_number, "7202210726");
        assert_eq!(data.reference_month, "SET/2024");
        assert_eq!(data.distributor_name, None);
        assert_eq!(data.energia_eletrica, EnergySection::new(100.0, 104.81));
        assert_eq!(data.energia_sceee, EnergySection::new(1860.0, 1081.12));
        assert_eq!(data.energia_compensada, EnergySection::new(1860.0, -1044.37));
        assert_close(data.contrib_ilum_publica, 47.57);
        assert_eq!(data.ressarcimento_danos, 0.0);

        assert_eq!(result.totals.consumo_total, 1960.0);
        assert_close(result.totals.valor_total_sem_gd, 1233.5);
        assert_close(result.totals.economia_gd, 1044.37);

        assert_eq!(result.warnings, vec![ExtractionWarning::DistributorUnknown]);
        assert!(!result.needs_review());
    }

    #[test]
    fn test_parse_single_line_text() {
        let text = SAMPLE.split_whitespace().collect::<Vec<_>>().join(" ");
        let result = EnergyInvoiceParser::new().parse(&text).unwrap();

        assert_eq!(result.data.energia_eletrica, EnergySection::new(100.0, 104.81));
        assert_eq!(result.data.energia_sceee, EnergySection::new(1860.0, 1081.12));
        assert_eq!(result.data.energia_compensada, EnergySection::new(1860.0, -1044.37));
        assert_close(result.data.contrib_ilum_publica, 47.57);
    }

    #[test]
    fn test_parse_with_reimbursement() {
        let text = "
            CEMIG DISTRIBUIÇÃO S.A.
            Nº DO CLIENTE 7202210726
            Referente a SET/2024
            Energia Elétrica kWh 100 1,00 100,00
            Energia SCEEE s/ ICMS kWh 200 0,50 100,00
            Energia compensada GD I kWh 200 0,50 -100,00
            Contrib Ilum Publica Municipal 50,00
            Ressarcimento de Danos 12,50
        ";
        let result = EnergyInvoiceParser::new().parse(text).unwrap();

        assert_eq!(result.data.distributor_name, Some(Distributor::Cemig));
        assert_eq!(result.data.ressarcimento_danos, 12.5);
        assert_close(result.totals.valor_total_sem_gd, 262.5);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let parser = EnergyInvoiceParser::new();
        assert_eq!(parser.parse(""), Err(ExtractionError::EmptyDocument));
        assert_eq!(parser.parse("Nº DO CLIENTE 7202210726"), Err(ExtractionError::EmptyDocument));
        assert_eq!(parser.parse(&" ".repeat(200)), Err(ExtractionError::EmptyDocument));
    }

    #[test]
    fn test_missing_client_number_is_fatal() {
        let text = "Referente a SET/2024\nEnergia Elétrica kWh 100 104,81\nContrib Ilum Publica Municipal 47,57";
        assert_eq!(
            EnergyInvoiceParser::new().parse(text),
            Err(ExtractionError::ClientNumberNotFound)
        );
    }

    #[test]
    fn test_client_checked_before_reference_month() {
        let text = "Documento sem identificação alguma, apenas texto corrido e longo o bastante.";
        assert_eq!(
            EnergyInvoiceParser::new().parse(text),
            Err(ExtractionError::ClientNumberNotFound)
        );
    }

    #[test]
    fn test_missing_reference_month_is_fatal() {
        let text = "Nº DO CLIENTE 7202210726\nEnergia Elétrica kWh 100 104,81\nContrib Ilum Publica Municipal 47,57";
        assert_eq!(
            EnergyInvoiceParser::new().parse(text),
            Err(ExtractionError::ReferenceMonthNotFound)
        );
    }

    #[test]
    fn test_missing_sections_degrade_to_zero() {
        let text = "ENEL\nNº DO CLIENTE 7202210726\nReferente a 09/2024\nSem itens de energia nesta página.";
        let result = EnergyInvoiceParser::new().parse(text).unwrap();

        assert_eq!(result.data.reference_month, "SET/2024");
        assert_eq!(result.data.distributor_name, Some(Distributor::Enel));
        assert!(result.needs_review());
        assert_eq!(result.totals, DerivedTotals::default());
        assert_eq!(
            result.warnings,
            vec![
                ExtractionWarning::SectionMissing(SoftField::Energy(EnergyKind::Eletrica)),
                ExtractionWarning::SectionMissing(SoftField::Energy(EnergyKind::Sceee)),
                ExtractionWarning::SectionMissing(SoftField::Energy(EnergyKind::Compensada)),
                ExtractionWarning::SectionMissing(SoftField::ContribIlumPublica),
            ]
        );
    }

    #[test]
    fn test_unreadable_section_is_reported() {
        let text = "Nº DO CLIENTE 7202210726\nReferente a SET/2024 LIGHT\nEnergia Elétrica kWh\nContrib Ilum Publica Municipal 47,57";
        let result = EnergyInvoiceParser::new().parse(text).unwrap();

        assert!(result.warnings.contains(&ExtractionWarning::SectionUnreadable(
            SoftField::Energy(EnergyKind::Eletrica)
        )));
        assert_eq!(result.data.energia_eletrica, EnergySection::default());
    }

    #[test]
    fn test_custom_windows() {
        let text = format!(
            "Nº DO CLIENTE 7202210726 Referente a SET/2024\nEnergia Elétrica kWh 100{}104,81",
            " ".repeat(150)
        );
        let narrow = EnergyInvoiceParser::new().parse(&text).unwrap();
        assert_eq!(narrow.data.energia_eletrica, EnergySection::default());

        let windows = SectionWindows {
            energia_eletrica: 200,
            ..SectionWindows::default()
        };
        let wide = EnergyInvoiceParser::new().with_windows(windows).parse(&text).unwrap();
        assert_eq!(wide.data.energia_eletrica, EnergySection::new(100.0, 104.81));
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let parser = EnergyInvoiceParser::new();
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| parser.parse(SAMPLE).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for result in &results {
            assert_eq!(result.data, results[0].data);
        }
    }
}
