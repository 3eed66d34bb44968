//! Bit-width rules for port types and bit-select expressions.
//!
//! Port types are free-form strings such as `logic [7:0]`, `wire`, or
//! `reg [15]`. Only the first bracketed range matters for width purposes;
//! the keyword in front of it is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*(\d+)\s*:\s*(\d+)\s*\]").expect("valid range regex"));

static SINGLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*(\d+)\s*\]").expect("valid single-bit regex"));

static SELECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[\s*(\d+)\s*(?::\s*(\d+))?\s*\]\s*$").expect("valid bit-select regex")
});

static SIGNAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^\[]+?)\s*(\[\s*\d+\s*(?::\s*\d+)?\s*\])?\s*$").expect("valid signal regex")
});

/// An inclusive, normalized bit range with `msb >= lsb`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BitRange {
    /// Most significant bit index.
    pub msb: u32,
    /// Least significant bit index.
    pub lsb: u32,
}

impl BitRange {
    /// Creates a range, swapping the bounds if they are given in ascending order.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            msb: a.max(b),
            lsb: a.min(b),
        }
    }

    /// Parses a bit-select such as `[7:0]`, `[0:7]`, or `[5]`.
    pub fn parse(select: &str) -> Option<Self> {
        let caps = SELECT_RE.captures(select)?;
        let msb: u32 = caps.get(1)?.as_str().parse().ok()?;
        let lsb = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => msb,
        };
        Some(Self::new(msb, lsb))
    }

    /// Returns the number of bits covered by this range, or `None` when it
    /// spans all 2^32 indices and does not fit a `u32`.
    pub fn width(&self) -> Option<u32> {
        (self.msb - self.lsb).checked_add(1)
    }

    /// Returns `true` if the two ranges share at least one bit.
    pub fn overlaps(&self, other: &BitRange) -> bool {
        self.lsb <= other.msb && other.lsb <= self.msb
    }
}

/// Computes the bit width declared by a port type string.
///
/// `[msb:lsb]` yields `|msb - lsb| + 1`, `[msb]` yields `msb + 1`, and a type
/// with no bracket at all is a single bit. Returns `None` when a bracket is
/// present but not numeric (e.g. `[WIDTH-1:0]`), since the width depends on
/// a parameter this layer cannot evaluate.
pub fn port_width(port_type: &str) -> Option<u32> {
    if let Some(caps) = RANGE_RE.captures(port_type) {
        let msb: u32 = caps[1].parse().ok()?;
        let lsb: u32 = caps[2].parse().ok()?;
        return msb.abs_diff(lsb).checked_add(1);
    }
    if let Some(caps) = SINGLE_RE.captures(port_type) {
        let msb: u32 = caps[1].parse().ok()?;
        return msb.checked_add(1);
    }
    if port_type.contains('[') {
        return None;
    }
    Some(1)
}

/// Computes the width selected by a bit-select attribute.
///
/// `[msb:lsb]` yields `|msb - lsb| + 1` and `[n]` yields 1. Anything else,
/// including the empty string, yields `None`.
pub fn bit_select_width(select: &str) -> Option<u32> {
    BitRange::parse(select).and_then(|r| r.width())
}

/// Returns `true` if two bit-select strings share at least one bit.
///
/// Unparseable selects never overlap.
pub fn bit_ranges_overlap(a: &str, b: &str) -> bool {
    match (BitRange::parse(a), BitRange::parse(b)) {
        (Some(a), Some(b)) => a.overlaps(&b),
        _ => false,
    }
}

/// Returns `true` if the union of `selects` covers every bit of a signal
/// `width` bits wide (bits `width-1` down to 0).
///
/// An empty select covers a single-bit signal. Bits outside the signal are
/// ignored.
pub fn bit_ranges_cover<S: AsRef<str>>(selects: &[S], width: u32) -> bool {
    if selects.is_empty() || width == 0 {
        return false;
    }
    let mut ranges: Vec<BitRange> = selects
        .iter()
        .filter_map(|select| {
            let select = select.as_ref();
            if select.trim().is_empty() {
                (width == 1).then_some(BitRange::new(0, 0))
            } else {
                BitRange::parse(select)
            }
        })
        .collect();
    ranges.sort_by_key(|r| r.lsb);

    // Lowest bit not yet covered, in u64 so `msb + 1` cannot overflow.
    let mut next = 0u64;
    for range in ranges {
        if u64::from(range.lsb) > next {
            break;
        }
        next = next.max(u64::from(range.msb) + 1);
    }
    next >= u64::from(width)
}

/// Splits a signal reference like `data_bus[7:0]` into its base name and
/// optional bit-select.
///
/// Strings that do not fit the `name[select]` shape are returned whole with
/// no select.
pub fn split_bit_select(signal: &str) -> (String, Option<String>) {
    match SIGNAL_RE.captures(signal) {
        Some(caps) => {
            let name = caps[1].trim().to_string();
            let select = caps.get(2).map(|m| m.as_str().trim().to_string());
            (name, select)
        }
        None => (signal.to_string(), None),
    }
}
