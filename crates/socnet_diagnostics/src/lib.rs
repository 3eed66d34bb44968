//! Coded findings about a netlist, and how they are printed.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels,
//! error codes, and a netlist [`Location`] (bus group, net, instance, port) so a
//! finding can be traced back to the source document without re-parsing it.
//! [`DiagnosticSink`] accumulates diagnostics across passes, and
//! [`DiagnosticRenderer`] implementations format them for the terminal or JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod location;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode, ParseCodeError};
pub use diagnostic::Diagnostic;
pub use location::Location;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
