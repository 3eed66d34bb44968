//! How serious a netlist finding is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`Diagnostic`](crate::Diagnostic).
///
/// A warning marks an item that was skipped or a net that looks wrong while
/// the rest of the netlist was still produced. An error means the result
/// must not be used: either a pass aborted, or strict checking promoted a
/// finding. `Warning < Error`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The item was skipped or the net is suspicious; output is still written.
    Warning,
    /// The netlist is unusable as produced.
    Error,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// The severity a finding has under strict checking.
    pub fn promoted(self) -> Self {
        Severity::Error
    }

    /// ANSI SGR parameters used when rendering this severity in color.
    pub(crate) fn ansi(self) -> &'static str {
        match self {
            Severity::Warning => "1;33",
            Severity::Error => "1;31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_outrank_warnings() {
        assert!(Severity::Warning < Severity::Error);
        let worst = [Severity::Warning, Severity::Error, Severity::Warning]
            .into_iter()
            .max();
        assert_eq!(worst, Some(Severity::Error));
    }

    #[test]
    fn strict_promotion() {
        assert_eq!(Severity::Warning.promoted(), Severity::Error);
        assert_eq!(Severity::Error.promoted(), Severity::Error);
        assert!(Severity::Warning.promoted().is_error());
    }

    #[test]
    fn json_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        let back: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, Severity::Error);
    }
}
