//! Error types for the fatura-core library.

use thiserror::Error;

/// Main error type for the fatura library.
#[derive(Error, Debug)]
pub enum FaturaError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Fatal outcomes of invoice field extraction.
///
/// Every other field degrades to zero or absent instead of failing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionError {
    /// Input text is missing or shorter than the minimum length.
    #[error("document appears empty or invalid")]
    EmptyDocument,

    /// No client number could be located.
    #[error("client number not found in document")]
    ClientNumberNotFound,

    /// No reference month could be located.
    #[error("reference month not found in document")]
    ReferenceMonthNotFound,
}

impl ExtractionError {
    /// Whether the input itself was unusable, as opposed to a readable
    /// document that lacks an identity field.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::EmptyDocument)
    }
}

/// Result type for the fatura library.
pub type Result<T> = std::result::Result<T, FaturaError>;
