//! Shared pipeline helpers for CLI commands.
//!
//! Contains the project and schema library resolution used by `expand` and
//! `check`, the load-process-check run itself, and diagnostic rendering.

use std::path::{Path, PathBuf};

use socnet_config::ProjectConfig;
use socnet_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, JsonRenderer, TerminalRenderer,
};
use socnet_doc::Node;
use socnet_netlist::{check_netlist, load_netlist_files, process, CheckOptions, NetlistError};
use socnet_schema::{SchemaError, SchemaLibrary};

use crate::{GlobalArgs, LibraryArgs, ReportFormat};

/// The project a command runs in. The configuration is optional.
#[derive(Debug)]
pub struct Project {
    /// Directory that relative configuration paths resolve against.
    pub root: PathBuf,
    /// The parsed `socnet.toml`, if one was found.
    pub config: Option<ProjectConfig>,
}

impl Project {
    /// Directory receiving generated files, unless overridden on the command line.
    pub fn output_dir(&self) -> PathBuf {
        match &self.config {
            Some(config) => self.root.join(&config.output.dir),
            None => self.root.join("output"),
        }
    }

    /// Whether the configuration asks for the unconnected port report.
    pub fn wants_report(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.output.report)
    }

    /// Check options from the configuration, with command-line overrides applied.
    pub fn check_options(&self, strict: bool, unconnected: bool) -> CheckOptions {
        let mut options = self
            .config
            .as_ref()
            .map(|c| c.check.to_options())
            .unwrap_or_default();
        options.strict |= strict;
        options.unconnected |= unconnected;
        options
    }
}

/// Resolves the project from global CLI args.
///
/// If `--config` is specified, uses that path (file → its parent dir, dir →
/// `socnet.toml` inside it). Otherwise walks up from the current directory
/// looking for `socnet.toml`; when none is found the current directory is
/// used without a configuration.
pub fn resolve_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            let config = socnet_config::load_config_file(&p)?;
            let root = p
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            return Ok(Project {
                root,
                config: Some(config),
            });
        }
        let config = socnet_config::load_config(&p)?;
        return Ok(Project {
            root: p,
            config: Some(config),
        });
    }

    let cwd = std::env::current_dir()?;
    match socnet_config::find_project_root(&cwd) {
        Some(root) => {
            let config = socnet_config::load_config(&root)?;
            Ok(Project {
                root,
                config: Some(config),
            })
        }
        None => {
            log::debug!("no socnet.toml found above {}", cwd.display());
            Ok(Project {
                root: cwd,
                config: None,
            })
        }
    }
}

/// Chooses schema paths: command-line paths first, otherwise the configured
/// paths resolved against the project root.
///
/// Configured paths that do not exist are skipped, since the defaults name
/// directories a project may not have.
pub fn library_paths(cli: &[PathBuf], configured: &[String], root: &Path) -> Vec<PathBuf> {
    if !cli.is_empty() {
        return cli.to_vec();
    }
    configured
        .iter()
        .map(|p| root.join(p))
        .filter(|p| {
            let exists = p.exists();
            if !exists {
                log::debug!("configured library path {} does not exist", p.display());
            }
            exists
        })
        .collect()
}

/// Loads the module and bus schema libraries for a command.
pub fn load_library(args: &LibraryArgs, project: &Project) -> Result<SchemaLibrary, SchemaError> {
    let (modules, buses) = match &project.config {
        Some(config) => (
            library_paths(&args.module_lib, &config.library.module, &project.root),
            library_paths(&args.bus_lib, &config.library.bus, &project.root),
        ),
        None => (args.module_lib.clone(), args.bus_lib.clone()),
    };
    SchemaLibrary::from_paths(&modules, &buses)
}

/// Output of a successful load-process-check run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Base name for generated files.
    pub name: String,
    /// The expanded netlist.
    pub document: Node,
    /// Pass warnings followed by check findings.
    pub diagnostics: Vec<Diagnostic>,
}

/// Loads the netlist files, expands them, and runs the checks.
pub fn run_netlist(
    paths: &[PathBuf],
    library: &SchemaLibrary,
    options: &CheckOptions,
) -> Result<PipelineResult, NetlistError> {
    let loaded = load_netlist_files(paths)?;
    let out = process(loaded.document, library)?;
    let mut sink = DiagnosticSink::new();
    sink.extend(out.diagnostics);
    sink.extend(check_netlist(&out.document, library, options));
    log::debug!(
        "`{}`: {} error(s), {} warning(s)",
        loaded.name,
        sink.error_count(),
        sink.warning_count()
    );
    Ok(PipelineResult {
        name: loaded.name,
        document: out.document,
        diagnostics: sink.take_all(),
    })
}

/// Renders diagnostics and returns the number of errors among them.
///
/// Text goes to stderr; under `--quiet` only errors are shown. JSON goes to
/// stdout unless stdout carries the netlist itself.
pub fn emit_diagnostics(
    diagnostics: &[Diagnostic],
    format: ReportFormat,
    global: &GlobalArgs,
    stdout_busy: bool,
) -> usize {
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                if global.quiet && !diag.severity.is_error() {
                    continue;
                }
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            let json = JsonRenderer::render_all(diagnostics);
            if stdout_busy {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
    }
    diagnostics
        .iter()
        .filter(|d| d.severity.is_error())
        .count()
}

/// Prints the `Result:` summary line for text output.
pub fn print_summary(diagnostics: &[Diagnostic], format: ReportFormat, global: &GlobalArgs) {
    if global.quiet || format != ReportFormat::Text {
        return;
    }
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity.is_error())
        .count();
    eprintln!(
        "   Result: {} error(s), {} warning(s)",
        errors,
        diagnostics.len() - errors
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use socnet_diagnostics::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn global_with_config(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config,
        }
    }

    const CONFIG: &str = "[project]\nname = \"t\"\n[output]\ndir = \"gen\"\n[check]\nstrict = true\n";

    #[test]
    fn resolve_project_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("socnet.toml");
        fs::write(&config_path, CONFIG).unwrap();

        let global = global_with_config(Some(config_path.to_str().unwrap().to_string()));
        let project = resolve_project(&global).unwrap();
        assert_eq!(project.root, tmp.path());
        assert_eq!(project.output_dir(), tmp.path().join("gen"));
        assert!(project.check_options(false, false).strict);
    }

    #[test]
    fn resolve_project_from_config_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("socnet.toml"), CONFIG).unwrap();
        let global = global_with_config(Some(tmp.path().to_str().unwrap().to_string()));
        let project = resolve_project(&global).unwrap();
        assert_eq!(project.root, tmp.path());
        assert!(project.config.is_some());
    }

    #[test]
    fn config_dir_without_file_errors() {
        let tmp = TempDir::new().unwrap();
        let global = global_with_config(Some(tmp.path().to_str().unwrap().to_string()));
        assert!(resolve_project(&global).is_err());
    }

    #[test]
    fn defaults_without_config() {
        let project = Project {
            root: PathBuf::from("/work"),
            config: None,
        };
        assert_eq!(project.output_dir(), PathBuf::from("/work/output"));
        assert!(!project.wants_report());
        let opts = project.check_options(true, true);
        assert!(opts.strict);
        assert!(opts.unconnected);
        assert!(opts.width);
    }

    #[test]
    fn cli_library_paths_take_priority() {
        let cli = vec![PathBuf::from("cli/module")];
        let configured = vec!["module".to_string()];
        assert_eq!(library_paths(&cli, &configured, Path::new("/root")), cli);
    }

    #[test]
    fn configured_library_paths_resolve_and_skip_missing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("module")).unwrap();
        let configured = vec!["module".to_string(), "bus".to_string()];
        let paths = library_paths(&[], &configured, tmp.path());
        assert_eq!(paths, vec![tmp.path().join("module")]);
    }

    #[test]
    fn run_netlist_from_files() {
        let tmp = TempDir::new().unwrap();
        let modules = tmp.path().join("mods.soc_mod");
        fs::write(
            &modules,
            "cpu:\n  port:\n    irq: {direction: input, type: logic}\n    dout: {direction: output, type: 'logic [7:0]'}\n",
        )
        .unwrap();
        let netlist = tmp.path().join("soc.soc_net");
        fs::write(
            &netlist,
            "instance:\n  u0:\n    module: cpu\n    port:\n      dout: {uplink: DOUT}\n",
        )
        .unwrap();

        let library = SchemaLibrary::from_paths(&[modules], &[]).unwrap();
        let result = run_netlist(&[netlist], &library, &CheckOptions::default()).unwrap();
        assert_eq!(result.name, "soc");
        assert_eq!(result.document.get_by_key_path("port.DOUT.direction", ""), "input");
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.severity == Severity::Warning));

        let strict = CheckOptions {
            direction: false,
            strict: true,
            ..CheckOptions::default()
        };
        let result = run_netlist(&[tmp.path().join("soc.soc_net")], &library, &strict).unwrap();
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn emit_counts_errors() {
        let diags = vec![
            socnet_netlist::codes::warn_undriven("a").promoted(),
            socnet_netlist::codes::warn_undriven("b"),
        ];
        let global = global_with_config(None);
        assert_eq!(emit_diagnostics(&diags, ReportFormat::Text, &global, false), 1);
    }
}
