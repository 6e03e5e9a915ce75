use failure::Fail;
use log::{error, warn};

use crate::catalog::{ConfigError, CoordinateParseError};
use crate::error::{ParseFault, TransportFault};
use crate::wfs::ModeConflictError;

/// The class of a `Diagnostic`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    ConfigError,
    TransportFault,
    ParseFault,
    CoordinateParseError,
    ModeConflictError,
}

/// A problem met while building a catalog.
/// None of these abort the caller, they only shrink the result.
#[derive(Debug, Fail)]
pub enum Diagnostic {
    #[fail(display = "Invalid catalog configuration: {}", _0)]
    Config(#[cause] ConfigError),
    #[fail(display = "WFS GetFeature failed, {}: {}", context, fault)]
    Transport {
        context: String,
        #[cause]
        fault: TransportFault,
    },
    #[fail(display = "Unreadable WFS response: {}", _0)]
    Parse(#[cause] ParseFault),
    #[fail(display = "{}", _0)]
    Coordinates(#[cause] CoordinateParseError),
    #[fail(display = "{}", _0)]
    ModeConflict(#[cause] ModeConflictError),
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::Config(_) => DiagnosticKind::ConfigError,
            Diagnostic::Transport { .. } => DiagnosticKind::TransportFault,
            Diagnostic::Parse(_) => DiagnosticKind::ParseFault,
            Diagnostic::Coordinates(_) => DiagnosticKind::CoordinateParseError,
            Diagnostic::ModeConflict(_) => DiagnosticKind::ModeConflictError,
        }
    }
}

/// This struct logs diagnostics as they occur and keeps them for later inspection.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind() {
            DiagnosticKind::ModeConflictError => error!("{}", diagnostic),
            _ => warn!("{}", diagnostic),
        }

        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.entries.iter().map(Diagnostic::kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
