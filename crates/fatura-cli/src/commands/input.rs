//! Reading invoice text from files.

use std::fs;
use std::path::Path;

use tracing::debug;

use fatura_core::models::config::PdfConfig;
use fatura_core::pdf::{PdfExtractor, PdfProcessor, PdfType};

/// File extensions accepted as invoice input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "text"];

/// Lowercased extension of `path`, empty when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Whether `path` looks like an invoice input file.
pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension(path).as_str())
}

/// Read the full text of an invoice from a PDF or a plain-text file.
pub fn read_text(path: &Path, config: &PdfConfig) -> anyhow::Result<String> {
    let extension = extension(path);

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::from_config(config);
            extractor.load(&data)?;
            debug!("PDF has {} pages", extractor.page_count());

            if extractor.analyze() == PdfType::Empty {
                anyhow::bail!(
                    "PDF has no embedded text (scanned documents are not supported): {}",
                    path.display()
                );
            }
            Ok(extractor.extract_limited_text()?)
        }
        "txt" | "text" => Ok(fs::read_to_string(path)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
