//! End-to-end runs through a project directory on disk.

use std::fs;
use std::path::{Path, PathBuf};

use socnet_conformance::{make_config, FIXTURE_BUSES, FIXTURE_MODULES};
use socnet_config::{find_project_root, load_config, ConfigError};
use socnet_doc::Node;
use socnet_netlist::codes::{W120, W122, W123};
use socnet_netlist::{check_netlist, load_netlist_files, process, UnconnectedReport};
use socnet_schema::SchemaLibrary;
use tempfile::TempDir;

const NETLIST: &str = r#"
instance:
  cpu: {module: cpu}
  uart0:
    module: uart
    port:
      tx: {uplink: UART_TX}
  gpio0: {module: gpio}
bus:
  apb0:
    cpu: {port: apb_if}
    uart0: {port: apb_if}
    gpio0: {port: apb_if}
"#;

fn project(config: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("socnet.toml"), config).unwrap();
    fs::create_dir_all(tmp.path().join("ip/module")).unwrap();
    fs::create_dir_all(tmp.path().join("ip/bus")).unwrap();
    fs::write(tmp.path().join("ip/module/soc.soc_mod"), FIXTURE_MODULES).unwrap();
    fs::write(tmp.path().join("ip/bus/apb.soc_bus"), FIXTURE_BUSES).unwrap();
    fs::write(tmp.path().join("ip/bus/README.txt"), "not a schema").unwrap();
    fs::create_dir_all(tmp.path().join("rtl/top")).unwrap();
    fs::write(tmp.path().join("rtl/top/soc.soc_net"), NETLIST).unwrap();
    tmp
}

const CONFIG: &str = r#"
[project]
name = "demo_soc"

[library]
module = "ip/module"
bus = ["ip/bus"]

[check]
unconnected = true
"#;

fn resolve(root: &Path, paths: &[String]) -> Vec<PathBuf> {
    paths.iter().map(|p| root.join(p)).collect()
}

#[test]
fn project_root_is_found_from_subdirectory() {
    let tmp = project(CONFIG);
    let found = find_project_root(&tmp.path().join("rtl/top")).unwrap();
    assert_eq!(found, tmp.path());
}

#[test]
fn configured_pipeline_end_to_end() {
    let tmp = project(CONFIG);
    let config = load_config(tmp.path()).unwrap();
    assert_eq!(config.project.name, "demo_soc");

    let library = SchemaLibrary::from_paths(
        &resolve(tmp.path(), &config.library.module),
        &resolve(tmp.path(), &config.library.bus),
    )
    .unwrap();
    assert_eq!(library.module_names().count(), 5);
    assert_eq!(library.bus_names().count(), 2);

    let loaded = load_netlist_files(&[tmp.path().join("rtl/top/soc.soc_net")]).unwrap();
    assert_eq!(loaded.name, "soc");
    let out = process(loaded.document, &library).unwrap();
    assert!(out.diagnostics.is_empty());

    let findings = check_netlist(&out.document, &library, &config.check.to_options());
    let codes: Vec<_> = findings.iter().map(|d| d.code).collect();
    // The uplinked net counts its top-level port as a second driver.
    assert_eq!(&codes[..3], &[W120, W122, W122]);
    assert_eq!(findings[2].location.net.as_deref(), Some("UART_TX"));
    assert!(codes[3..].iter().all(|c| *c == W123));

    // The uplinked port is on a net, so it is not reported.
    assert!(!findings.iter().any(|d| {
        d.location.instance.as_deref() == Some("uart0") && d.location.port.as_deref() == Some("tx")
    }));

    let report = UnconnectedReport::scan(&out.document, &library);
    assert_eq!(report.ports().len(), 7);
    assert_eq!(report.ports().len(), codes.len() - 3);

    let text = out.document.to_yaml_string().unwrap();
    let reloaded = Node::from_yaml_str(&text).unwrap();
    assert_eq!(reloaded, out.document);
    assert_eq!(reloaded.get_by_key_path("port.UART_TX.direction", ""), "input");
    assert!(!reloaded.contains_key("bus"));
}

#[test]
fn missing_config_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(load_config(tmp.path()), Err(ConfigError::IoError { .. })));
}

#[test]
fn check_section_maps_to_options() {
    let config = make_config("[check]\nwidth = false\nstrict = true\n");
    let options = config.check.to_options();
    assert!(!options.width);
    assert!(options.direction);
    assert!(!options.unconnected);
    assert!(options.strict);
}

#[test]
fn output_section_defaults() {
    let config = make_config("");
    assert_eq!(config.output.dir, "output");
    assert!(!config.output.report);
    assert_eq!(config.library.module, vec!["module"]);
}
