//! ---
//! courier_section: "05-external-interfaces"
//! courier_subsection: "tests"
//! courier_type: "source"
//! courier_scope: "test"
//! courier_description: "End to end checks of the courierctl commands."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::fs;

use assert_cmd::Command;
use serde_json::Value;

fn courierctl() -> Command {
    let mut cmd = Command::cargo_bin("courierctl").expect("courierctl binary");
    cmd.env_remove("COURIER_CONFIG")
        .env("COURIER_LOG", "warn")
        .current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout is json")
}

#[test]
fn build_prints_wire_json() {
    let output = courierctl()
        .args([
            "build",
            "--sender",
            "billing",
            "--id",
            "m1",
            "--type",
            "Command",
            "--command",
            "refund",
            "--content-type",
            "JSON",
            "--header",
            "Tenant=acme",
            "--copy-headers",
            "Tenant,Trace",
            "--payload",
            "{\"order\":\"o-1\"}",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let wire = stdout_json(&output);
    assert_eq!(wire["id"], "m1");
    assert_eq!(wire["sn"], "billing");
    assert!(wire["ts"].is_i64());
    assert_eq!(wire["hs"]["Message-Type"], "Command");
    assert_eq!(wire["hs"]["Command"], "refund");
    assert_eq!(wire["hs"]["Copy-Headers"], "Tenant, Trace");
    assert_eq!(wire["hs"]["Tenant"], "acme");
    assert_eq!(wire["pl"], "{\"order\":\"o-1\"}");
}

#[test]
fn build_uses_configured_sender_and_headers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("courier.toml");
    fs::write(
        &config,
        "[envelope]\nsender = \"from-config\"\n[envelope.default_headers]\nZone = \"eu-1\"\n",
    )
    .expect("write config");

    let output = courierctl()
        .arg("--config")
        .arg(&config)
        .args(["build", "--type", "Simple"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let wire = stdout_json(&output);
    assert_eq!(wire["sn"], "from-config");
    assert_eq!(wire["hs"]["Zone"], "eu-1");
    assert!(!wire["id"].as_str().unwrap_or_default().is_empty());
}

#[test]
fn inspect_reports_summary_as_json() {
    let envelope = r#"{"id":"m9","sn":"billing","ts":1700000000000,"hs":{"Message-Type":"Reply"},"pl":"ok"}"#;
    let output = courierctl()
        .args(["inspect", "-", "--format", "json"])
        .write_stdin(envelope)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary = stdout_json(&output);
    assert_eq!(summary["id"], "m9");
    assert_eq!(summary["message_type"], "Reply");
    assert_eq!(summary["missing_header"], "Replies-To");
    assert_eq!(summary["payload_bytes"], 2);
}

#[test]
fn inspect_rejects_invalid_envelopes() {
    courierctl()
        .args(["inspect", "-"])
        .write_stdin(r#"{"id":"m1","sn":"","ts":1,"hs":{},"pl":""}"#)
        .assert()
        .failure();
}

#[test]
fn reply_carries_requested_headers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let original = dir.path().join("original.json");
    fs::write(
        &original,
        r#"{"id":"m1","sn":"billing","ts":1700000000000,"hs":{"Message-Type":"Command","Command":"refund","X":"1","Z":"3","Copy-Headers":"X, Y"},"pl":""}"#,
    )
    .expect("write envelope");

    let output = courierctl()
        .arg("reply")
        .arg(&original)
        .args(["--sender", "shipping", "--payload", "done"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let reply = stdout_json(&output);
    assert_eq!(reply["sn"], "shipping");
    assert_eq!(reply["hs"]["Message-Type"], "Reply");
    assert_eq!(reply["hs"]["Replies-To"], "m1");
    assert_eq!(reply["hs"]["X"], "1");
    assert!(reply["hs"].get("Y").is_none());
    assert!(reply["hs"].get("Z").is_none());
    assert_eq!(reply["pl"], "done");
}
