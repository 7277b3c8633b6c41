//! Common regex patterns for Brazilian utility invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Client number: "Nº DO CLIENTE  Nº DA INSTALAÇÃO" header with both ids on the next line
    pub static ref CLIENT_AND_INSTALLATION: Regex = Regex::new(
        r"(?i)N[º°]?\s*DO\s*CLIENTE\s+N[º°]?\s*DA\s*INSTALA[ÇC][ÃA]O\s*\n\s*(\d{8,})\s+(\d{8,})"
    ).unwrap();

    pub static ref CLIENT_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)N[º°]?\s*DO\s*CLIENTE\s*[\s:\-]*\s*(\d{8,})"
    ).unwrap();

    pub static ref CLIENT_NUMBER_BARE: Regex = Regex::new(
        r"(?i)CLIENTE\s*[\s:\-]*\s*(\d{8,})"
    ).unwrap();

    pub static ref CLIENT_NUMBER_SHORT: Regex = Regex::new(
        r"(?i)N[º°]\s*CLIENTE\s*[\s:\-]*\s*(\d{8,})"
    ).unwrap();

    pub static ref CLIENT_NUMBER_STANDALONE: Regex = Regex::new(
        r"\b(\d{9,11})\b"
    ).unwrap();

    // Reference period
    pub static ref MONTH_ABBR_YEAR: Regex = Regex::new(
        r"(?i)(JAN|FEV|MAR|ABR|MAI|JUN|JUL|AGO|SET|OUT|NOV|DEZ)\s*/\s*(\d{4})"
    ).unwrap();

    pub static ref MONTH_NUMERIC_YEAR: Regex = Regex::new(
        r"\b(0[1-9]|1[0-2])\s*/\s*(\d{4})\b"
    ).unwrap();

    // Energy sections
    pub static ref ENERGIA_ELETRICA: Regex = Regex::new(
        r"(?i)Energia\s+El[eé]trica(?:\s+kWh)?"
    ).unwrap();

    pub static ref ENERGIA_SCEEE: Regex = Regex::new(
        r"(?i)Energia\s+SCE+E?\s*(?:s/?\s*ICMS)?"
    ).unwrap();

    pub static ref ENERGIA_COMPENSADA: Regex = Regex::new(
        r"(?i)Energia\s+compensada\s+GD\s*I?"
    ).unwrap();

    // Scalar charges
    pub static ref CONTRIB_ILUM_PUBLICA: Regex = Regex::new(
        r"(?i)Contrib\.?\s*(?:Ilumina[çc][ãa]o|Ilum\.?)?\s*P[uú]blica\s*Municipal"
    ).unwrap();

    pub static ref RESSARCIMENTO_DANOS: Regex = Regex::new(
        r"(?i)Ressarcimento\s+(?:de\s+)?Danos"
    ).unwrap();

    // Locale-formatted number: optional sign, digits with thousands dots, decimal comma
    pub static ref LOCALE_NUMBER: Regex = Regex::new(
        r"-?\d[\d.]*(?:,\d+)?"
    ).unwrap();

    // Longest leading decimal number once separators are normalized
    pub static ref FLOAT_PREFIX: Regex = Regex::new(
        r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?"
    ).unwrap();
}

/// Keywords that open a new section; a window never reads past one.
pub const SECTION_KEYWORDS: &[&str] = &["Energia", "Contrib", "Ressarcimento"];
