//! Shared foundational types used across the socnet netlist toolchain.
//!
//! This crate provides the numeric literal engine, port direction handling,
//! and the bit-width rules used to compare port types and bit-selects.

#![warn(missing_docs)]

pub mod direction;
pub mod number;
pub mod width;

pub use direction::{Direction, ParseDirectionError};
pub use number::{NumberBase, NumberLiteral};
pub use width::{bit_ranges_cover, bit_ranges_overlap, bit_select_width, port_width, BitRange};
