//! `socnet expand`: netlist expansion pipeline.
//!
//! 1. Resolve the project (walk up looking for `socnet.toml`)
//! 2. Load the module and bus schema libraries
//! 3. Load and merge the netlist files
//! 4. Expand buses, resolve links and uplinks
//! 5. Run the configured consistency checks
//! 6. Write `<stem>.yaml` (and optionally `<stem>.nc.rpt`)
//! 7. Render diagnostics

use std::fs;
use std::path::Path;

use socnet_netlist::{codes, UnconnectedReport};
use socnet_schema::SchemaLibrary;

use crate::pipeline::{
    emit_diagnostics, load_library, print_summary, resolve_project, run_netlist, PipelineResult,
};
use crate::{ExpandArgs, GlobalArgs};

/// Runs the `socnet expand` command.
///
/// Returns exit code 0 on success, 1 on a fatal netlist error or when a
/// strict check produced errors.
pub fn run(args: &ExpandArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = resolve_project(global)?;
    let library = load_library(&args.library, &project)?;
    let options = project.check_options(args.findings.strict, false);

    if !global.quiet {
        eprintln!("   Expanding {} file(s)", args.netlist.len());
    }

    let result = match run_netlist(&args.netlist, &library, &options) {
        Ok(result) => result,
        Err(e) => {
            emit_diagnostics(&[codes::error_diagnostic(&e)], args.findings.format, global, false);
            return Ok(1);
        }
    };

    let yaml = result.document.to_yaml_string()?;
    let out_dir = args.output.clone().unwrap_or_else(|| project.output_dir());
    if args.stdout {
        print!("{yaml}");
    } else {
        fs::create_dir_all(&out_dir)?;
        let path = out_dir.join(format!("{}.yaml", result.name));
        fs::write(&path, yaml)?;
        if !global.quiet {
            eprintln!("      Wrote {}", path.display());
        }
    }

    if args.report || project.wants_report() {
        let path = write_report(&result, &library, &out_dir)?;
        if !global.quiet {
            eprintln!("      Wrote {}", path.display());
        }
    }

    let errors = emit_diagnostics(&result.diagnostics, args.findings.format, global, args.stdout);
    print_summary(&result.diagnostics, args.findings.format, global);
    Ok(if errors > 0 { 1 } else { 0 })
}

/// Writes the unconnected port report next to the expanded netlist.
fn write_report(
    result: &PipelineResult,
    library: &SchemaLibrary,
    out_dir: &Path,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let report = UnconnectedReport::scan(&result.document, library);
    log::info!(
        "{} unconnected port(s) on {} instance(s)",
        report.ports().len(),
        report.instance_count()
    );
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(UnconnectedReport::file_name(&result.name));
    fs::write(&path, report.to_yaml(&result.name)?)?;
    Ok(path)
}
