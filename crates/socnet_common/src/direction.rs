//! Port directions with synonym normalization and reversal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The direction of a module or top-level port.
///
/// Parsing accepts the abbreviated forms `in` and `out` as well as the full
/// `input`/`output`/`inout` keywords, case-insensitively. Display always
/// produces the full keyword.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Data flows into the port.
    Input,
    /// Data flows out of the port.
    Output,
    /// The port can both drive and be driven.
    Inout,
}

impl Direction {
    /// Parses a direction keyword, returning `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "input" => Some(Direction::Input),
            "out" | "output" => Some(Direction::Output),
            "inout" => Some(Direction::Inout),
            _ => None,
        }
    }

    /// Returns the opposite direction. `Inout` is its own opposite.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
            Direction::Inout => Direction::Inout,
        }
    }

    /// Returns the canonical keyword for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Inout => "inout",
        }
    }

    /// Returns `true` if two ports with these directions may share a name.
    ///
    /// `Inout` is compatible with everything; otherwise the directions must match.
    pub fn is_compatible_with(self, other: Direction) -> bool {
        self == Direction::Inout || other == Direction::Inout || self == other
    }

    /// Returns `true` if a port with this direction can drive a net.
    pub fn can_drive(self) -> bool {
        matches!(self, Direction::Output | Direction::Inout)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing direction keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid port direction: '{}'", self.input)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::parse(s).ok_or_else(|| ParseDirectionError {
            input: s.to_string(),
        })
    }
}
