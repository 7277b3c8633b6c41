//! Record output formats.

use fatura_core::invoice::rules::format_brl;
use fatura_core::InvoiceRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub const CSV_HEADER: [&str; 16] = [
    "client_number",
    "reference_month",
    "distributor",
    "energia_eletrica_kwh",
    "energia_eletrica_value",
    "energia_sceee_kwh",
    "energia_sceee_value",
    "energia_compensada_kwh",
    "energia_compensada_value",
    "contrib_ilum_publica",
    "ressarcimento_danos",
    "consumo_total",
    "valor_total_sem_gd",
    "economia_gd",
    "source",
    "processed_at",
];

/// One CSV row matching [`CSV_HEADER`].
pub fn csv_row(record: &InvoiceRecord) -> Vec<String> {
    let data = &record.data;
    let totals = &record.totals;

    vec![
        data.client_number.clone(),
        data.reference_month.clone(),
        data.distributor_name.map(|d| d.to_string()).unwrap_or_default(),
        data.energia_eletrica.kwh.to_string(),
        data.energia_eletrica.value.to_string(),
        data.energia_sceee.kwh.to_string(),
        data.energia_sceee.value.to_string(),
        data.energia_compensada.kwh.to_string(),
        data.energia_compensada.value.to_string(),
        data.contrib_ilum_publica.to_string(),
        data.ressarcimento_danos.to_string(),
        totals.consumo_total.to_string(),
        totals.valor_total_sem_gd.to_string(),
        totals.economia_gd.to_string(),
        record.source.clone().unwrap_or_default(),
        record.processed_at.to_rfc3339(),
    ]
}

pub fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let data = &record.data;
    let totals = &record.totals;
    let mut output = String::new();

    output.push_str(&format!("Cliente: {}\n", data.client_number));
    output.push_str(&format!("Referência: {}\n", data.reference_month));
    if let Some(distributor) = data.distributor_name {
        output.push_str(&format!("Distribuidora: {}\n", distributor));
    }
    output.push('\n');

    output.push_str("Itens:\n");
    for (label, section) in [
        ("Energia Elétrica", &data.energia_eletrica),
        ("Energia SCEEE", &data.energia_sceee),
        ("Energia Compensada GD", &data.energia_compensada),
    ] {
        output.push_str(&format!(
            "  {:<22} {:>10} kWh  R$ {:>12}\n",
            label,
            format_brl(section.kwh).trim_end_matches(",00"),
            format_brl(section.value)
        ));
    }
    output.push_str(&format!(
        "  {:<22} {:>14}  R$ {:>12}\n",
        "Contrib. Ilum. Pública",
        "",
        format_brl(data.contrib_ilum_publica)
    ));
    if data.ressarcimento_danos != 0.0 {
        output.push_str(&format!(
            "  {:<22} {:>14}  R$ {:>12}\n",
            "Ressarcimento Danos",
            "",
            format_brl(data.ressarcimento_danos)
        ));
    }
    output.push('\n');

    output.push_str("Totais:\n");
    output.push_str(&format!(
        "  Consumo total:      {} kWh\n",
        format_brl(totals.consumo_total).trim_end_matches(",00")
    ));
    output.push_str(&format!(
        "  Valor sem GD:       R$ {}\n",
        format_brl(totals.valor_total_sem_gd)
    ));
    output.push_str(&format!(
        "  Economia GD:        R$ {}\n",
        format_brl(totals.economia_gd)
    ));

    output
}
