use super::*;

#[test]
fn test_bus_name_parsing() {
    assert_eq!(BusName::parse("RBUS3"), BusName::Rbus(3));
    assert_eq!(BusName::parse("SBUS12"), BusName::Sbus(12));
    assert_eq!(BusName::parse("NODE<7>"), BusName::Node(7));
    assert_eq!(BusName::parse("NODE7"), BusName::Node(7));
    assert_eq!(BusName::parse("VDD"), BusName::Vdd);
    assert_eq!(BusName::parse("VSS"), BusName::Vss);
    assert_eq!(BusName::parse("RBUSx"), BusName::Other);
    assert_eq!(BusName::parse("NODE<a>"), BusName::Other);
    assert_eq!(BusName::parse("CLK"), BusName::Other);
}

#[test]
fn test_switch_levels() {
    assert_eq!(SwitchState::from_key("ON").levels(), (true, true));
    assert_eq!(SwitchState::from_key("PHI1").levels(), (true, false));
    assert_eq!(SwitchState::from_key("PHI2").levels(), (false, true));
    assert_eq!(SwitchState::from_key("OFF").levels(), (false, false));
    /* Anything unknown opens both switches */
    assert_eq!(SwitchState::from_key("on"), SwitchState::Off);
    assert_eq!(SwitchState::from_key(""), SwitchState::Off);
}

#[test]
fn test_circuit_keeps_bus_order() {
    let circuit = Circuit::from_json_str(r#"{
        "RBUS2": ["A"],
        "SBUS1": [{"terminal": "B", "connection": "PHI1"}],
        "RBUS1": ["C", "D"]
    }"#).unwrap();

    let buses: Vec<_> = circuit.buses().collect();
    assert_eq!(buses, vec![
        ("RBUS2", BusName::Rbus(2)),
        ("SBUS1", BusName::Sbus(1)),
        ("RBUS1", BusName::Rbus(1)),
    ]);
    assert_eq!(circuit.pins("RBUS1").unwrap(), vec!["C", "D"]);
    assert!(circuit.pins("RBUS9").unwrap().is_empty());

    let switches = circuit.switches("SBUS1").unwrap();
    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0].terminal, "B");
    assert_eq!(switches[0].state(), SwitchState::Phi1);
}

#[test]
fn test_circuit_rejects_malformed_entries() {
    let circuit = Circuit::from_json_str(r#"{
        "RBUS1": "A",
        "SBUS1": ["B"]
    }"#).unwrap();

    assert!(matches!(circuit.pins("RBUS1"), Err(Error::BadCircuitEntry { .. })));
    assert!(matches!(circuit.switches("SBUS1"), Err(Error::BadCircuitEntry { .. })));
}

#[test]
fn test_sizes() {
    let sizes = Sizes::from_json_str(r#"{
        "M1": [4],
        "M2": 31,
        "M3": [32],
        "M4": [-1],
        "M5": [],
        "M6": ["big"]
    }"#).unwrap();
    let mut diag = Diagnostics::new();

    assert_eq!(sizes.size_of("M1", &mut diag), 4);
    assert_eq!(sizes.size_of("M2", &mut diag), 31);
    assert_eq!(sizes.size_of("missing", &mut diag), 0);
    assert!(diag.is_clean());

    assert_eq!(sizes.size_of("M3", &mut diag), 0);
    assert_eq!(sizes.size_of("M4", &mut diag), 0);
    assert_eq!(sizes.size_of("M5", &mut diag), 0);
    assert_eq!(sizes.size_of("M6", &mut diag), 0);
    assert_eq!(diag.warnings().len(), 4);
    assert_eq!(diag.warnings()[0], "Size 32 for device M3 is not a 5-bit number.");

    assert_eq!(sizes.display_size("M3"), "32");
    assert_eq!(sizes.display_size("M6"), "big");
    assert_eq!(sizes.display_size("missing"), "0");
}
