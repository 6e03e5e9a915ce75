pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod nvcl;
pub mod reader;
pub mod settings;
pub mod wfs;
pub mod xml;

#[cfg(test)]
mod test_utils;

pub use crate::catalog::{BoreholeRecord, Catalog, CatalogConfig, CatalogParams};
pub use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use crate::reader::{NvclReader, ReaderNotReady};
pub use crate::settings::Settings;
