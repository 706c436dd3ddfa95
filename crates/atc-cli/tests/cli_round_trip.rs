//! Confirms the CLI binary's analytical output matches calling the pipeline
//! in-process directly: the transport path must not change the result.

use atc_core::airports::StaticAirportTable;
use atc_core::pipeline::{analyze, AnalysisConfig};
use serde_json::{json, Value};
use std::io::Write;
use std::process::{Command, Stdio};

fn head_on_crossing_batch() -> Vec<Value> {
    vec![
        json!({
            "ACID": "FLX",
            "plane_type": "Boeing 737",
            "route": "0N/0E 0N/2E",
            "altitude_ft": 30_000,
            "departure_time": 0,
            "speed_kt": 360,
            "passengers": 150,
            "is_cargo": false,
        }),
        json!({
            "ACID": "FLY",
            "plane_type": "Boeing 737",
            "route": "0N/2E 0N/0E",
            "altitude_ft": 30_000,
            "departure_time": 0,
            "speed_kt": 360,
            "passengers": 150,
            "is_cargo": false,
        }),
    ]
}

#[test]
fn cli_conflicts_match_in_process_analyze() {
    let payload = head_on_crossing_batch();

    let mut child = Command::new(env!("CARGO_BIN_EXE_atc-cli"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn atc-cli");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(serde_json::to_string(&payload).unwrap().as_bytes())
        .expect("write batch to stdin");

    let output = child.wait_with_output().expect("wait for atc-cli");
    assert!(output.status.success(), "atc-cli exited non-zero");

    let cli_report: Value =
        serde_json::from_slice(&output.stdout).expect("stdout must be a JSON report");

    let airports = StaticAirportTable::canadian();
    let in_process_report = analyze(&payload, &airports, &AnalysisConfig::default());
    let in_process_conflicts = serde_json::to_value(&in_process_report.conflicts).unwrap();

    assert_eq!(cli_report["conflicts"], in_process_conflicts);
    assert!(cli_report["conflicts"].as_array().unwrap().len() >= 1);
}
