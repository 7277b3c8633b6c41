//! Invoice field extraction module.

mod derive;
mod parser;
pub mod rules;

pub use derive::derive;
pub use parser::{
    EnergyInvoiceParser, ExtractionResult, ExtractionWarning, InvoiceParser, SoftField,
};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
