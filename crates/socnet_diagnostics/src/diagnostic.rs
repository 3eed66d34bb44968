//! A single finding from loading, expanding, or checking a netlist.

use crate::code::DiagnosticCode;
use crate::location::Location;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A coded message about one bus, net, instance, or port.
///
/// Notes carry the per-connection detail (`uart0.s_paddr: 32 bits`); help
/// lines suggest a fix. Both are omitted from JSON when empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Warning, or error when fatal or promoted by strict checking.
    pub severity: Severity,
    /// Stable identifier such as `W120`.
    pub code: DiagnosticCode,
    /// One-line summary, lower case, no trailing period.
    pub message: String,
    /// The netlist element the message is about.
    pub location: Location,
    /// Detail lines rendered as `= note:`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Suggested fixes rendered as `= help:`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
}

impl Diagnostic {
    /// An error-severity diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::with_severity(Severity::Error, code, message, location)
    }

    /// A warning-severity diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::with_severity(Severity::Warning, code, message, location)
    }

    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Appends a `note:` line.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Appends a `help:` line.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Raises a warning to error severity, keeping its code and text.
    pub fn promoted(mut self) -> Self {
        self.severity = self.severity.promoted();
        self
    }
}
