//! Conformance test helpers for the socnet netlist toolchain.
//!
//! Provides a fixture schema library describing a small APB-based SoC and a
//! pipeline function that runs netlist text through load → bus expansion →
//! link resolution → consistency checks, returning structured results for
//! assertion in integration tests.

#![warn(missing_docs)]

use std::path::Path;

use socnet_config::ProjectConfig;
use socnet_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use socnet_doc::Node;
use socnet_netlist::{check_netlist, codes, load_netlist, process, CheckOptions, NetlistError, NetlistSource};
use socnet_schema::{SchemaLibrary, SchemaProvider};

/// Module schemas of the fixture SoC.
///
/// `uart` declares its APB interface as `pad_apb_if`, so bus groups naming
/// `apb_if` reach it through the `pad_` variant lookup. `gpio` maps only part
/// of the APB signals. `timer` declares interfaces with an unregistered bus
/// type, with no bus type, and with a bus type that has no signals.
pub const FIXTURE_MODULES: &str = r#"
cpu:
  port:
    clk: {direction: input, type: logic}
    m_paddr: {direction: output, type: "logic [31:0]"}
    m_pwrite: {direction: output, type: logic}
    m_pwdata: {direction: output, type: "logic [31:0]"}
    m_prdata: {direction: input, type: "logic [31:0]"}
    irq: {direction: input, type: logic}
  bus:
    apb_if:
      bus: apb
      mode: master
      mapping: {paddr: m_paddr, pwrite: m_pwrite, pwdata: m_pwdata, prdata: m_prdata}
uart:
  port:
    clk: {direction: input, type: logic}
    s_paddr: {direction: input, type: "logic [31:0]"}
    s_pwrite: {direction: input, type: logic}
    s_pwdata: {direction: input, type: "logic [31:0]"}
    s_prdata: {direction: output, type: "logic [31:0]"}
    tx: {direction: output, type: logic}
    rx: {direction: input, type: logic}
    irq: {direction: output, type: logic}
  bus:
    pad_apb_if:
      bus: apb
      mode: slave
      mapping: {paddr: s_paddr, pwrite: s_pwrite, pwdata: s_pwdata, prdata: s_prdata}
gpio:
  port:
    clk: {direction: input, type: logic}
    s_paddr: {direction: input, type: "logic [11:0]"}
    s_prdata: {direction: output, type: "logic [31:0]"}
    pad: {direction: inout, type: "logic [7:0]"}
  bus:
    apb_if:
      bus: apb
      mode: slave
      mapping: {paddr: s_paddr, prdata: s_prdata}
clkgen:
  port:
    clk_in: {direction: input}
    clk_out: {direction: output, type: logic}
timer:
  port:
    clk: {direction: input, type: logic}
  bus:
    axi_if: {bus: axi4}
    raw_if: {mapping: {a: clk}}
    sb_if: {bus: sideband}
"#;

/// Bus schemas of the fixture SoC. `sideband` declares no signals.
pub const FIXTURE_BUSES: &str = r#"
apb:
  port:
    paddr: {}
    pwrite: {}
    pwdata: {}
    prdata: {}
sideband:
  description: placeholder bus without signals
"#;

/// Builds the fixture schema library from [`FIXTURE_MODULES`] and [`FIXTURE_BUSES`].
pub fn fixture_library() -> SchemaLibrary {
    let mut library = SchemaLibrary::new();
    library
        .load_modules_str(FIXTURE_MODULES, Path::new("fixture.soc_mod"))
        .unwrap();
    library
        .load_buses_str(FIXTURE_BUSES, Path::new("fixture.soc_bus"))
        .unwrap();
    library
}

/// Creates a minimal `ProjectConfig` with extra TOML appended.
pub fn make_config(extra: &str) -> ProjectConfig {
    let toml_str = format!("[project]\nname = \"conformance_test\"\n{extra}");
    socnet_config::load_config_from_str(&toml_str).unwrap()
}

/// Result of running the full load → expand → check pipeline.
#[derive(Debug)]
pub struct PipelineResult {
    /// The expanded netlist, absent when a fatal error stopped the pipeline.
    pub document: Option<Node>,
    /// The fatal error, if any.
    pub fatal: Option<NetlistError>,
    /// All diagnostics emitted during the pipeline, including the fatal one.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    fn new(document: Option<Node>, fatal: Option<NetlistError>, diagnostics: Vec<Diagnostic>) -> Self {
        let mut sink = DiagnosticSink::new();
        sink.extend(diagnostics);
        Self {
            document,
            fatal,
            has_errors: sink.has_errors(),
            error_count: sink.error_count(),
            warning_count: sink.warning_count(),
            diagnostics: sink.take_all(),
        }
    }

    /// The diagnostic codes in emission order.
    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    /// Returns `true` if a diagnostic with `code` was emitted.
    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Text at a dotted path of the expanded document, or `""`.
    pub fn get(&self, path: &str) -> String {
        self.document
            .as_ref()
            .map(|d| d.get_by_key_path(path, ""))
            .unwrap_or_default()
    }

    /// Returns `true` if the expanded document has a value at `path`.
    pub fn has(&self, path: &str) -> bool {
        self.document.as_ref().is_some_and(|d| d.has_key_path(path))
    }
}

/// Runs netlist source texts (merged in order) through the full pipeline.
pub fn run_pipeline(
    sources: &[&str],
    schemas: &dyn SchemaProvider,
    options: &CheckOptions,
) -> PipelineResult {
    let sources: Vec<_> = sources
        .iter()
        .enumerate()
        .map(|(i, text)| NetlistSource::from_text(format!("source{i}.soc_net"), *text))
        .collect();
    let result = load_netlist(&sources).and_then(|loaded| process(loaded.document, schemas));
    match result {
        Ok(out) => {
            let mut diagnostics = out.diagnostics;
            diagnostics.extend(check_netlist(&out.document, schemas, options));
            PipelineResult::new(Some(out.document), None, diagnostics)
        }
        Err(e) => {
            let diag = codes::error_diagnostic(&e);
            PipelineResult::new(None, Some(e), vec![diag])
        }
    }
}

/// Runs one netlist text against the fixture library with default checks.
pub fn full_pipeline(source: &str) -> PipelineResult {
    run_pipeline(&[source], &fixture_library(), &CheckOptions::default())
}

/// Runs one netlist text against the fixture library with the checks disabled.
pub fn expand_only(source: &str) -> PipelineResult {
    let options = CheckOptions {
        width: false,
        direction: false,
        unconnected: false,
        strict: false,
    };
    run_pipeline(&[source], &fixture_library(), &options)
}
