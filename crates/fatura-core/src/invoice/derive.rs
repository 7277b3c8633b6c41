//! Derived totals.

use crate::models::invoice::{DerivedTotals, ExtractedInvoiceData};

/// Compute consumption, amount without distributed generation and savings.
///
/// Pure arithmetic over already extracted fields.
pub fn derive(extracted: &ExtractedInvoiceData) -> DerivedTotals {
    DerivedTotals {
        consumo_total: extracted.energia_eletrica.kwh + extracted.energia_sceee.kwh,
        valor_total_sem_gd: extracted.energia_eletrica.value
            + extracted.energia_sceee.value
            + extracted.contrib_ilum_publica
            + extracted.ressarcimento_danos,
        economia_gd: extracted.energia_compensada.value.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::EnergySection;
    use pretty_assertions::assert_eq;

    fn sample() -> ExtractedInvoiceData {
        let mut data = ExtractedInvoiceData::new("7202210726", "SET/2024");
        data.energia_eletrica = EnergySection::new(100.0, 104.81);
        data.energia_sceee = EnergySection::new(1860.0, 1081.12);
        data.energia_compensada = EnergySection::new(1860.0, -1044.37);
        data.contrib_ilum_publica = 47.57;
        data
    }

    #[test]
    fn test_derive_totals() {
        let totals = derive(&sample());

        assert_eq!(totals.consumo_total, 1960.0);
        assert!((totals.valor_total_sem_gd - 1233.5).abs() < 1e-9);
        assert!((totals.economia_gd - 1044.37).abs() < 1e-9);
    }

    #[test]
    fn test_reimbursement_is_included() {
        let mut data = sample();
        data.energia_eletrica.value = 100.0;
        data.energia_sceee.value = 100.0;
        data.contrib_ilum_publica = 50.0;
        data.ressarcimento_danos = 12.5;

        assert_eq!(derive(&data).valor_total_sem_gd, 262.5);
    }

    #[test]
    fn test_savings_ignore_sign_convention() {
        let mut data = sample();
        data.energia_compensada.value = 1044.37;
        assert_eq!(derive(&data).economia_gd, 1044.37);

        data.energia_compensada.value = -1044.37;
        assert_eq!(derive(&data).economia_gd, 1044.37);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let data = sample();
        assert_eq!(derive(&data), derive(&data));
    }

    #[test]
    fn test_empty_sections_derive_zero() {
        let data = ExtractedInvoiceData::new("12345678", "JAN/2024");
        assert_eq!(derive(&data), DerivedTotals::default());
    }
}
