//! `socnet check`: expansion followed by consistency checks, reporting only.

use socnet_netlist::codes;

use crate::pipeline::{emit_diagnostics, load_library, print_summary, resolve_project, run_netlist};
use crate::{CheckArgs, GlobalArgs};

/// Runs the `socnet check` command.
///
/// Nothing is written. Returns exit code 1 if any diagnostic is an error.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = resolve_project(global)?;
    let library = load_library(&args.library, &project)?;
    let options = project.check_options(args.findings.strict, args.unconnected);

    if !global.quiet {
        let name = project
            .config
            .as_ref()
            .map(|c| c.project.name.as_str())
            .unwrap_or("netlist");
        eprintln!("   Checking {name}");
    }

    let diagnostics = match run_netlist(&args.netlist, &library, &options) {
        Ok(result) => result.diagnostics,
        Err(e) => vec![codes::error_diagnostic(&e)],
    };

    let errors = emit_diagnostics(&diagnostics, args.findings.format, global, false);
    print_summary(&diagnostics, args.findings.format, global);
    Ok(if errors > 0 { 1 } else { 0 })
}
