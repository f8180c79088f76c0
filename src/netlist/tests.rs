use super::*;
use crate::chip_data::{PinNumbers, SizingRegisters, SwitchMatrix};
use crate::circuit::{Circuit, Sizes};
use crate::log::Diagnostics;
use crate::switch_matrix::resolve_switch_matrix;
use chrono::NaiveDate;

fn header() -> Header {
    let at = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap()
        .and_hms_opt(9, 30, 0).unwrap();
    Header::new("in.json", &Timestamp::At(at))
}

fn pin_numbers() -> PinNumbers {
    serde_json::from_str(r#"{
        "IN": 20, "OUT": "21", "BIAS": 22.0,
        "SBUS1": 30, "SBUS2": 31, "SBUS3": 32, "SBUS4": 33, "SBUS5": 34, "DATA_SBUS6": 35
    }"#).unwrap()
}

#[test]
fn test_header() {
    let w = SubcktWriter::new(&header());
    assert_eq!(w.finish(), "* File created on: 2025-06-05 09:30:00\n* From in.json\n.ENDS\n");

    let w = SubcktWriter::new(&Header::new("x.json", &Timestamp::Omit));
    assert_eq!(w.finish(), "* From x.json\n.ENDS\n");
}

#[test]
fn test_timestamp_from_env() {
    assert_eq!(Timestamp::from_env(true), Timestamp::Omit);

    std::env::set_var("SOURCE_DATE_EPOCH", "1749115800");
    let pinned = Timestamp::from_env(false);
    let omitted = Timestamp::from_env(true);
    std::env::set_var("SOURCE_DATE_EPOCH", "garbage");
    let garbage = Timestamp::from_env(false);
    std::env::remove_var("SOURCE_DATE_EPOCH");

    let w = SubcktWriter::new(&Header::new("in.json", &pinned));
    assert_eq!(w.finish(), "* File created on: 2025-06-05 09:30:00\n* From in.json\n.ENDS\n");
    /* --no-timestamp beats a pinned epoch */
    assert_eq!(omitted, Timestamp::Omit);
    assert_eq!(garbage, Timestamp::Now);
    assert_eq!(Timestamp::from_env(false), Timestamp::Now);
}

#[test]
fn test_sizes_subckt() {
    let registers: SizingRegisters = serde_json::from_str(r#"{
        "MP1": {"2": 7, "1": 6},
        "MN1": {"1": 1, "2": 2}
    }"#).unwrap();
    let sizes = Sizes::from_json_str(r#"{"MN1": [2], "MP1": [3]}"#).unwrap();
    let mut diag = Diagnostics::new();

    let text = sizes_subckt(&registers, &sizes, ".SUBCKT PK_set_sizes", &header(), &mut diag);

    assert_eq!(text, concat!(
        "* File created on: 2025-06-05 09:30:00\n",
        "* From in.json\n",
        ".SUBCKT PK_set_sizes\n",
        "* Device: MN1 Size: 2\n",
        "V_MN1_1 PROBE<1> VSS 0\n",
        "V_MN1_2 PROBE<2> VDD 0\n",
        "\n",
        "* Device: MP1 Size: 3\n",
        "V_MP1_6 PROBE<6> VDD 0\n",
        "V_MP1_7 PROBE<7> VDD 0\n",
        "\n",
        ".ENDS\n",
    ));
    assert!(diag.is_clean());
}

#[test]
fn test_sizes_subckt_comment_keeps_raw_size() {
    let registers: SizingRegisters = serde_json::from_str(r#"{"M": {"1": 1}}"#).unwrap();
    let sizes = Sizes::from_json_str(r#"{"M": [33]}"#).unwrap();
    let mut diag = Diagnostics::new();

    let text = sizes_subckt(&registers, &sizes, "", &Header::new("s", &Timestamp::Omit), &mut diag);

    assert!(text.contains("* Device: M Size: 33\nV_M_1 PROBE<1> VSS 0\n"));
    assert_eq!(diag.warnings().len(), 1);
}

#[test]
fn test_pins_subckt() {
    let circuit = Circuit::from_json_str(r#"{
        "RBUS3": ["OUT", "IN"],
        "SBUS1": [{"terminal": "IN", "connection": "ON"}],
        "NODE<1>": ["BIAS"],
        "RBUS1": ["BIAS"]
    }"#).unwrap();
    let mut diag = Diagnostics::new();

    let text = pins_subckt(&pin_numbers(), &circuit, "TEMPLATE", &header(), &mut diag).unwrap();

    assert_eq!(text, concat!(
        "* File created on: 2025-06-05 09:30:00\n",
        "* From in.json\n",
        "TEMPLATE\n",
        "VRBUS3_to_pin21 RBUS<3> pin<21> 0\n",
        "* RBUS3 connected to OUT (pin<21>)\n",
        "VRBUS1_to_pin22 RBUS<1> pin<22> 0\n",
        "* RBUS1 connected to BIAS (pin<22>)\n",
        "VSBUS1_to_pin30 SWBUS<1> pin<30> 0\n",
        "VSBUS2_to_pin31 SWBUS<2> pin<31> 0\n",
        "VSBUS3_to_pin32 SWBUS<3> pin<32> 0\n",
        "VSBUS4_to_pin33 SWBUS<4> pin<33> 0\n",
        "VSBUS5_to_pin34 SWBUS<5> pin<34> 0\n",
        "VDATA_SBUS6_to_pin35 SWBUS<6> pin<35> 0\n",
        ".ENDS\n",
    ));
    assert!(diag.is_clean());
}

#[test]
fn test_pins_subckt_warns_on_unknown_pins() {
    let circuit = Circuit::from_json_str(r#"{"RBUS1": ["NOPE"], "RBUS2": [], "VDD": ["IN"]}"#).unwrap();
    let pins: PinNumbers = serde_json::from_str(r#"{"SBUS1": 30}"#).unwrap();
    let mut diag = Diagnostics::new();

    let text = pins_subckt(&pins, &circuit, "", &header(), &mut diag).unwrap();

    assert!(!text.contains("RBUS<"));
    assert!(text.contains("VSBUS1_to_pin30 SWBUS<1> pin<30> 0\n"));
    /* NOPE, empty RBUS2, VDD, and SBUS2..DATA_SBUS6 */
    assert_eq!(diag.warnings().len(), 8);
}

#[test]
fn test_switch_matrix_subckt() {
    let matrix = SwitchMatrix {
        pins: serde_json::from_str(r#"{"IN": 1, "CLK": 2}"#).unwrap(),
        registers: serde_json::from_str(r#"{
            "1": {"RBUS1": 3},
            "2": {"SBUS1a": 1, "SBUS1b": 1888}
        }"#).unwrap(),
    };
    let circuit = Circuit::from_json_str(r#"{
        "RBUS1": ["IN"],
        "SBUS1": [{"terminal": "CLK", "connection": "PHI2"}]
    }"#).unwrap();
    let mut diag = Diagnostics::new();
    let settings = resolve_switch_matrix(&matrix, &circuit, &mut diag).unwrap();

    let text = switch_matrix_subckt(&settings, ".SUBCKT PK_set_SWMATRIX\n", &header());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(&lines[.. 8], &[
        "* File created on: 2025-06-05 09:30:00",
        "* From in.json",
        ".SUBCKT PK_set_SWMATRIX",
        "* Connection: RBUS1, Pin: IN, sw_matrix_pin: 1, Register: 3",
        "VIN_to_RBUS1 PROBE<3> VDD 0",
        "* Connection: SBUS1, Terminal: CLK, Connection Key: PHI2",
        "V1_to_CLK PROBE<1> VSS 0",
        "V1888_to_CLK PROBE<1888> VDD 0",
    ]);
    assert_eq!(lines[8], "Vprobe_2_to_VSS PROBE<2> VSS 0");
    assert_eq!(lines[9], "Vprobe_4_to_VSS PROBE<4> VSS 0");
    assert_eq!(lines[lines.len() - 2], "Vprobe_1887_to_VSS PROBE<1887> VSS 0");
    assert_eq!(lines[lines.len() - 1], ".ENDS");
    /* 8 leading lines, 1885 unused probes, .ENDS */
    assert_eq!(lines.len(), 8 + 1885 + 1);
}

#[test]
fn test_nodes_subckt() {
    let circuit = Circuit::from_json_str(r#"{
        "NODE<2>": ["OUT"],
        "VSS": ["BIAS"],
        "VDD": ["IN", "GHOST"],
        "NODE1": ["IN"],
        "RBUS1": ["IN"]
    }"#).unwrap();
    let mut diag = Diagnostics::new();

    let text = nodes_subckt(&pin_numbers(), &circuit, "TEMPLATE", &header(), &mut diag).unwrap();

    assert_eq!(text, concat!(
        "* File created on: 2025-06-05 09:30:00\n",
        "* From in.json\n",
        "\n",
        "TEMPLATE\n",
        "* IN connected to VDD\n",
        "Vshort_VDD_IN pin<20> pin<13> 0\n",
        "* BIAS connected to VSS\n",
        "Vshort_VSS_BIAS pin<22> pin<1> 0\n",
        "* OUT connected to NODE<2>\n",
        "Vshort_NODE_2_OUT NODE<2> pin<21> 0\n",
        "* IN connected to NODE<1>\n",
        "Vshort_NODE_1_IN NODE<1> pin<20> 0\n",
        ".ENDS\n",
    ));
    assert_eq!(diag.warnings(), &[
        "Pin name 'GHOST' not found in pin mapping".to_string(),
        "Invalid node format 'RBUS1', expected NODE<n>".to_string(),
    ]);
}

#[test]
fn test_read_probe_values() {
    let netlist = concat!(
        "* V_X PROBE<9> VDD 0\n",
        "+ PROBE<9> VDD\n",
        ".SUBCKT X PROBE<1> PROBE<2>\n",
        "V_MN1_1 PROBE<1> VDD 0\n",
        "  V12_to_VDDA PROBE<12> VSS 0\n",
        "Vshort PROBE<3> NODE<1> 0\n",
        "R1 PROBE<4> VDD 1k\n",
        "Vrev VSS PROBE<5> 0\n",
        "V_MN1_1 PROBE<1> VSS 0\n",
        ".ENDS\n",
    );

    let values: Vec<_> = read_probe_values(netlist).into_iter().collect();
    assert_eq!(values, vec![(1, false), (5, false), (12, false)]);
}
