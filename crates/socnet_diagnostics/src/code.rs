//! Diagnostic codes such as `E111` and `W120`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a code names a fatal condition (`E`) or a skipped item or
/// check finding (`W`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    /// Fatal conditions, prefixed with `E`.
    Error,
    /// Skipped items and check findings, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'E' | 'e' => Some(Category::Error),
            'W' | 'w' => Some(Category::Warning),
            _ => None,
        }
    }
}

/// A category prefix and a three-digit number, e.g. `W105`.
///
/// Serialized as its display string so JSON output reads `"code": "W105"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Error returned when text is not a diagnostic code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseCodeError(String);

impl fmt::Display for ParseCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a diagnostic code (expected e.g. W120)", self.0)
    }
}

impl std::error::Error for ParseCodeError {}

impl FromStr for DiagnosticCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCodeError(s.to_string());
        let mut chars = s.trim().chars();
        let category = chars.next().and_then(Category::from_prefix).ok_or_else(err)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let number = digits.parse().map_err(|_| err())?;
        Ok(Self::new(category, number))
    }
}

impl From<DiagnosticCode> for String {
    fn from(code: DiagnosticCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for DiagnosticCode {
    type Error = ParseCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_to_three_digits() {
        assert_eq!(DiagnosticCode::new(Category::Error, 111).to_string(), "E111");
        assert_eq!(DiagnosticCode::new(Category::Warning, 7).to_string(), "W007");
    }

    #[test]
    fn parse_codes() {
        assert_eq!(
            "W120".parse::<DiagnosticCode>(),
            Ok(DiagnosticCode::new(Category::Warning, 120))
        );
        assert_eq!(
            " e100 ".parse::<DiagnosticCode>(),
            Ok(DiagnosticCode::new(Category::Error, 100))
        );
        for bad in ["", "W", "X120", "W12a", "W-1", "W99999"] {
            assert!(bad.parse::<DiagnosticCode>().is_err(), "{bad}");
        }
    }

    #[test]
    fn serialized_as_string() {
        let code = DiagnosticCode::new(Category::Warning, 105);
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"W105\"");
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<DiagnosticCode>("\"Q1\"").is_err());
    }
}
