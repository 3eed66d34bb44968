//! `socnet number`: reformat numeric literals.

use socnet_common::NumberLiteral;
use socnet_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use socnet_netlist::codes;

use crate::{GlobalArgs, NumberArgs, NumberStyle};

/// Runs the `socnet number` command.
///
/// Prints one line per literal. Literals that cannot be represented exactly
/// are printed verbatim and reported as warnings.
pub fn run(args: &NumberArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let renderer = TerminalRenderer::new(global.color);
    for text in &args.literals {
        let literal = NumberLiteral::parse(text);
        if literal.error_detected && !global.quiet {
            eprint!("{}", renderer.render(&codes::warn_inexact_literal(text)));
        }
        println!("{}", format_literal(&literal, args.style));
    }
    Ok(0)
}

fn format_literal(literal: &NumberLiteral, style: NumberStyle) -> String {
    match style {
        NumberStyle::Verilog => literal.format_verilog(),
        NumberStyle::C => literal.format_c(),
        NumberStyle::Plain => literal.format(),
        NumberStyle::Padded => literal.format_with_bit_width(),
    }
}
