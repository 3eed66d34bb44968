//! Arbitrary-precision integer literals in Verilog and C notation.
//!
//! [`NumberLiteral::parse`] accepts sized and unsized Verilog literals
//! (`8'hFF`, `'b1010`), C-style literals (`0x1F`, `0b101`, `017`), bare
//! decimals, and an optional leading `[msb:lsb]` vector range that fixes the
//! width. Underscores are digit separators. Values are held in a [`BigUint`]
//! so literals of any width round-trip exactly.
//!
//! A literal that cannot be represented exactly (unknown `x`/`z` digits,
//! digits invalid for the base, a width that does not fit in 32 bits) is
//! flagged with `error_detected`, and every formatter then returns the
//! original text untouched.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static VECTOR_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d+)\s*:\s*(\d+)\]").expect("valid vector range regex"));

static VERILOG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)?'([bodhxBODHX])(.+)$").expect("valid verilog literal regex"));

/// The radix a literal was written in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum NumberBase {
    /// Base 2.
    Binary,
    /// Base 8.
    Octal,
    /// Base 10.
    Decimal,
    /// Base 16.
    Hexadecimal,
    /// No base could be determined (empty input).
    #[default]
    Unknown,
}

impl NumberBase {
    /// Returns the numeric radix, or `None` for [`NumberBase::Unknown`].
    pub fn radix(self) -> Option<u32> {
        match self {
            NumberBase::Binary => Some(2),
            NumberBase::Octal => Some(8),
            NumberBase::Decimal => Some(10),
            NumberBase::Hexadecimal => Some(16),
            NumberBase::Unknown => None,
        }
    }

    /// Maps a Verilog base character (`b`, `o`, `d`, `h`, `x`) to a base.
    fn from_verilog_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'b' => NumberBase::Binary,
            'o' => NumberBase::Octal,
            'd' => NumberBase::Decimal,
            'h' | 'x' => NumberBase::Hexadecimal,
            _ => NumberBase::Unknown,
        }
    }
}

/// A parsed integer literal together with its notation and width.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NumberLiteral {
    /// The text exactly as it was given to [`NumberLiteral::parse`].
    pub original: String,
    /// The radix the literal was written in.
    pub base: NumberBase,
    /// The magnitude. Zero when `error_detected` is set.
    pub value: BigUint,
    /// Bit width, either explicit or inferred from the magnitude.
    pub width: u32,
    /// Whether the width came from the literal itself.
    pub has_explicit_width: bool,
    /// Whether the literal could not be represented exactly.
    pub error_detected: bool,
}

impl NumberLiteral {
    /// Parses a numeric literal. Never fails; problems set `error_detected`.
    pub fn parse(text: &str) -> Self {
        let mut result = Self {
            original: text.to_string(),
            ..Self::default()
        };

        let mut clean: String = text.trim().chars().filter(|&c| c != '_').collect();
        if clean.is_empty() {
            log::warn!("empty number literal");
            result.error_detected = true;
            return result;
        }

        if let Some(caps) = VECTOR_RANGE_RE.captures(&clean) {
            let msb = caps[1].parse::<u32>();
            let lsb = caps[2].parse::<u32>();
            match (msb, lsb) {
                (Ok(msb), Ok(lsb)) => match msb.abs_diff(lsb).checked_add(1) {
                    Some(width) => {
                        result.width = width;
                        result.has_explicit_width = true;
                    }
                    None => {
                        log::warn!("vector range in '{text}' is wider than 2^32-1 bits");
                        result.error_detected = true;
                    }
                },
                _ => result.error_detected = true,
            }
            clean = VECTOR_RANGE_RE.replace(&clean, "").trim().to_string();
        }

        let (base, digits) = if let Some(caps) = VERILOG_RE.captures(&clean) {
            if let Some(width) = caps.get(1) {
                match width.as_str().parse::<u32>() {
                    Ok(0) | Err(_) => {
                        log::warn!("unsupported literal width in '{text}'");
                        result.error_detected = true;
                    }
                    Ok(w) if !result.has_explicit_width => {
                        result.width = w;
                        result.has_explicit_width = true;
                    }
                    Ok(_) => {}
                }
            }
            let base_char = caps[2].chars().next().unwrap_or('d');
            (
                NumberBase::from_verilog_char(base_char),
                caps[3].to_string(),
            )
        } else if let Some(rest) = clean
            .strip_prefix("0x")
            .or_else(|| clean.strip_prefix("0X"))
        {
            (NumberBase::Hexadecimal, rest.to_string())
        } else if let Some(rest) = clean
            .strip_prefix("0b")
            .or_else(|| clean.strip_prefix("0B"))
        {
            (NumberBase::Binary, rest.to_string())
        } else if clean.starts_with('0') && clean.len() > 1 {
            (NumberBase::Octal, clean.clone())
        } else {
            (NumberBase::Decimal, clean.clone())
        };

        result.base = base;
        match base
            .radix()
            .and_then(|radix| BigUint::parse_bytes(digits.as_bytes(), radix))
        {
            Some(value) => result.value = value,
            None => {
                log::warn!("cannot represent literal '{text}' exactly, keeping original text");
                result.error_detected = true;
            }
        }
        if result.error_detected {
            result.value = BigUint::zero();
        }

        if !result.has_explicit_width {
            result.width = if result.error_detected {
                estimate_width(&result.original)
            } else if result.value.is_zero() {
                1
            } else {
                u32::try_from(result.value.bits()).unwrap_or(u32::MAX)
            };
        }

        result
    }

    /// Formats the value with a Verilog base prefix but no width (`'hff`).
    pub fn format(&self) -> String {
        if self.error_detected {
            return self.original.clone();
        }
        match self.base {
            NumberBase::Binary => format!("'b{}", self.value.to_str_radix(2)),
            NumberBase::Octal => format!("'o{}", self.value.to_str_radix(8)),
            NumberBase::Decimal => format!("'d{}", self.value.to_str_radix(10)),
            NumberBase::Hexadecimal => format!("'h{}", self.hex_digits()),
            NumberBase::Unknown => self.value.to_str_radix(10),
        }
    }

    /// Formats the value as a complete Verilog literal (`8'hff`).
    pub fn format_verilog(&self) -> String {
        if self.error_detected {
            return self.original.clone();
        }
        if self.width > 0 && self.base != NumberBase::Unknown {
            format!("{}{}", self.width, self.format())
        } else {
            self.format()
        }
    }

    /// Formats the value in C syntax (`0xff`, `0b101`, `017`, `42`).
    pub fn format_c(&self) -> String {
        if self.error_detected {
            return self.original.clone();
        }
        match self.base {
            NumberBase::Binary => format!("0b{}", self.value.to_str_radix(2)),
            NumberBase::Octal => format!("0{}", self.value.to_str_radix(8)),
            NumberBase::Hexadecimal => format!("0x{}", self.hex_digits()),
            NumberBase::Decimal | NumberBase::Unknown => self.value.to_str_radix(10),
        }
    }

    /// Formats the value as a Verilog literal zero-padded to the full width
    /// (`8'h0f`, `4'b0011`).
    pub fn format_with_bit_width(&self) -> String {
        if self.error_detected {
            return self.original.clone();
        }
        let width = self.width as usize;
        match self.base {
            NumberBase::Binary => format!(
                "{}'b{:0>pad$}",
                self.width,
                self.value.to_str_radix(2),
                pad = width
            ),
            NumberBase::Octal => format!(
                "{}'o{:0>pad$}",
                self.width,
                self.value.to_str_radix(8),
                pad = width.div_ceil(3)
            ),
            NumberBase::Hexadecimal => format!(
                "{}'h{:0>pad$}",
                self.width,
                self.hex_digits(),
                pad = width.div_ceil(4)
            ),
            NumberBase::Decimal | NumberBase::Unknown => {
                format!("{}'d{}", self.width, self.value.to_str_radix(10))
            }
        }
    }

    /// Returns the value as an `i64` if it is exact and fits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.error_detected {
            return None;
        }
        self.value.to_i64()
    }

    /// Returns the value as a `u64` if it is exact and fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.error_detected {
            return None;
        }
        self.value.to_u64()
    }

    fn hex_digits(&self) -> String {
        self.value.to_str_radix(16).to_ascii_lowercase()
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_verilog())
    }
}

/// Rough width estimate for a literal whose value could not be computed.
///
/// Counts the digits after the base marker (`'h`, `0x`, ...) at 4, 3 or 1
/// bits each. Decimal text gets 32, 64 or 128 bits by length.
fn estimate_width(original: &str) -> u32 {
    let lower: String = original
        .trim()
        .chars()
        .filter(|&c| c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let (base, digits) = match lower.split_once('\'') {
        Some((_, rest)) => {
            let mut chars = rest.chars();
            (chars.next(), chars.as_str())
        }
        None => match lower.strip_prefix("0x") {
            Some(rest) => (Some('h'), rest),
            None => match lower.strip_prefix("0b") {
                Some(rest) => (Some('b'), rest),
                None => (None, lower.as_str()),
            },
        },
    };
    let count = u32::try_from(digits.len()).unwrap_or(u32::MAX);
    let width = match base {
        Some('h' | 'x') => count.saturating_mul(4),
        Some('o') => count.saturating_mul(3),
        Some('b') => count,
        _ if lower.len() > 20 => 128,
        _ if lower.len() > 10 => 64,
        _ => 32,
    };
    width.max(1)
}
