//! Link and uplink resolution against the fixture library.

use socnet_conformance::{expand_only, full_pipeline};
use socnet_netlist::codes::{E110, E111, E112, W109};
use socnet_netlist::{net_connections, Connection, NetlistError, TOP_LEVEL};

fn connections(result: &socnet_conformance::PipelineResult, net: &str) -> Vec<Connection> {
    let doc = result.document.as_ref().unwrap();
    net_connections(doc.get("net").and_then(|n| n.get(net)).unwrap())
}

#[test]
fn uplink_creates_port_and_net() {
    let result = expand_only(
        "instance:\n  u0:\n    module: uart\n    port:\n      tx: {uplink: PAD_X}\n",
    );
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.get("port.PAD_X.direction"), "input");
    assert_eq!(result.get("port.PAD_X.type"), "logic");
    assert_eq!(result.get("port.PAD_X.connect"), "PAD_X");
    assert_eq!(
        connections(&result, "PAD_X"),
        vec![Connection::module("u0", "tx"), Connection::top_level("PAD_X")]
    );
}

#[test]
fn top_level_direction_is_reversed() {
    let result = expand_only(
        r#"
instance:
  u0:
    module: uart
    port:
      tx: {uplink: TXD}
      rx: {uplink: RXD}
  g0:
    module: gpio
    port:
      pad: {uplink: GPIO}
"#,
    );
    assert_eq!(result.get("port.TXD.direction"), "input");
    assert_eq!(result.get("port.RXD.direction"), "output");
    assert_eq!(result.get("port.GPIO.direction"), "inout");
    assert_eq!(result.get("port.GPIO.type"), "logic [7:0]");
}

#[test]
fn untyped_port_uplinks_as_wire() {
    let result = expand_only(
        "instance:\n  c0:\n    module: clkgen\n    port:\n      clk_in: {uplink: REFCLK}\n",
    );
    assert_eq!(result.get("port.REFCLK.type"), "wire");
    assert_eq!(result.get("port.REFCLK.direction"), "output");
}

#[test]
fn shared_uplink_reuses_port() {
    let result = expand_only(
        r#"
instance:
  u0:
    module: uart
    port:
      irq: {uplink: IRQ}
  u1:
    module: uart
    port:
      irq: {uplink: IRQ}
"#,
    );
    assert!(result.diagnostics.is_empty());
    let conns = connections(&result, "IRQ");
    assert_eq!(conns.len(), 3);
    assert_eq!(conns[0], Connection::module("u0", "irq"));
    assert_eq!(conns[1].participant(), TOP_LEVEL);
    assert_eq!(conns[2], Connection::module("u1", "irq"));
}

#[test]
fn opposing_uplinks_conflict() {
    let result = expand_only(
        "instance:\n  u0:\n    module: uart\n    port:\n      tx: {uplink: SER}\n      rx: {uplink: SER}\n",
    );
    assert!(result.document.is_none());
    assert_eq!(result.codes(), vec![E111]);
    assert!(result.has_errors);
    assert!(matches!(
        result.fatal,
        Some(NetlistError::IncompatibleDirection { ref port, .. }) if port == "SER"
    ));
}

#[test]
fn uplinks_of_different_width_conflict() {
    let result = expand_only(
        r#"
instance:
  cpu:
    module: cpu
    port:
      m_paddr: {uplink: P}
  u0:
    module: uart
    port:
      tx: {uplink: P}
"#,
    );
    assert_eq!(result.codes(), vec![E112]);
    assert!(matches!(
        result.fatal,
        Some(NetlistError::IncompatibleWidth {
            expected: 1,
            existing: 32,
            ..
        })
    ));
}

#[test]
fn uplink_to_unknown_port_is_fatal() {
    let result = expand_only(
        "instance:\n  u0:\n    module: uart\n    port:\n      cts: {uplink: CTS}\n",
    );
    assert_eq!(result.codes(), vec![E110]);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.location.instance.as_deref(), Some("u0"));
    assert_eq!(diag.location.port.as_deref(), Some("cts"));
}

#[test]
fn predeclared_top_level_port_is_reused() {
    let result = expand_only(
        r#"
instance:
  u0:
    module: uart
    port:
      tx: {uplink: TXD}
port:
  TXD: {direction: inout, type: logic, pin: A12}
"#,
    );
    assert!(result.fatal.is_none());
    assert_eq!(result.get("port.TXD.direction"), "inout");
    assert_eq!(result.get("port.TXD.pin"), "A12");
}

#[test]
fn links_join_named_nets() {
    let result = full_pipeline(
        r#"
instance:
  u0:
    module: uart
    port:
      tx: {link: serial}
  u1:
    module: uart
    port:
      rx: {link: serial}
"#,
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(
        connections(&result, "serial"),
        vec![Connection::module("u0", "tx"), Connection::module("u1", "rx")]
    );
}

#[test]
fn link_bit_select_is_kept() {
    let result = expand_only(
        r#"
instance:
  g0:
    module: gpio
    port:
      pad: {link: "leds[3:0]"}
"#,
    );
    assert_eq!(result.get("net.leds.g0.port"), "pad");
    assert_eq!(result.get("net.leds.g0.bits"), "[3:0]");
}

#[test]
fn links_merge_into_bus_nets() {
    let result = expand_only(
        r#"
instance:
  cpu: {module: cpu}
  uart0:
    module: uart
    port:
      s_paddr: {link: apb0_paddr}
      tx: {link: apb0_paddr}
bus:
  apb0:
    cpu: {port: apb_if}
"#,
    );
    assert_eq!(result.codes(), vec![W109]);
    let conns = connections(&result, "apb0_paddr");
    assert_eq!(
        conns,
        vec![
            Connection::module("cpu", "m_paddr"),
            Connection::module("uart0", "s_paddr")
        ]
    );
}
