//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FaturaError, Result};

/// Main configuration for the fatura pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaturaConfig {
    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum number of characters for a document to be considered.
    pub min_text_length: usize,

    /// Character windows read after each section label.
    pub windows: SectionWindows,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            windows: SectionWindows::default(),
        }
    }
}

/// Maximum characters scanned after each section label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionWindows {
    pub energia_eletrica: usize,
    pub energia_sceee: usize,
    pub energia_compensada: usize,
    pub contrib_ilum_publica: usize,
    pub ressarcimento_danos: usize,
}

impl Default for SectionWindows {
    fn default() -> Self {
        Self {
            energia_eletrica: 120,
            energia_sceee: 150,
            energia_compensada: 150,
            contrib_ilum_publica: 80,
            ressarcimento_danos: 80,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: u32,

    /// Minimum embedded text length to consider the PDF text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

impl FaturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| FaturaError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| FaturaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
