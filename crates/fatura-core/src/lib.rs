//! Core library for Brazilian electric-utility invoice processing.
//!
//! This crate provides:
//! - Field extraction from invoice text (client, period, distributor,
//!   energy sections, municipal lighting contribution, reimbursements)
//! - Brazilian-locale number normalization
//! - Derived totals (consumption, amount without distributed generation,
//!   savings)
//! - PDF text extraction and an in-memory record ledger with monthly
//!   aggregation

pub mod error;
pub mod models;
pub mod pdf;
pub mod invoice;
pub mod ledger;

pub use error::{ExtractionError, FaturaError, Result};
pub use models::invoice::{DerivedTotals, EnergySection, ExtractedInvoiceData, InvoiceRecord};
pub use models::config::FaturaConfig;
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use invoice::{derive, EnergyInvoiceParser, ExtractionResult, ExtractionWarning, InvoiceParser};
pub use invoice::rules::{parse_locale_number, Distributor};
pub use ledger::{Dashboard, InvoiceLedger, InvoiceQuery};
