//! ---
//! sw_section: "05-hosts"
//! sw_subsection: "tests"
//! sw_type: "source"
//! sw_scope: "test"
//! sw_description: "Smoke tests for the stormwallctl binary."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
use std::io::Write;

use assert_cmd::Command;
use tempfile::Builder;

fn ctl() -> Command {
    let mut cmd = Command::cargo_bin("stormwallctl").unwrap();
    cmd.env_remove("STORMWALL_CONFIG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn run_reports_idle_server_online() {
    let out = stdout_of(ctl().args(["run", "--ticks", "120"]));
    assert!(out.contains("status    ONLINE after 120 ticks"));
    assert!(out.contains("legit 9k rps"));
}

#[test]
fn run_json_reports_unmitigated_flood_offline() {
    let out = stdout_of(ctl().args([
        "run",
        "--ticks",
        "400",
        "--attack",
        "--attack-intensity",
        "100",
        "--format",
        "json",
    ]));
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["last"]["status"], "OFFLINE");
    assert_eq!(report["last"]["current_attack_rps"], 20_000_000);
    assert_eq!(report["controls"]["attack_type"], "volumetric");
    assert!(report["first_offline_tick"].as_u64().is_some());
}

#[test]
fn run_clamps_out_of_range_intensity() {
    let out = stdout_of(ctl().args([
        "run",
        "--ticks",
        "1",
        "--attack",
        "--attack-intensity",
        "-20",
        "--format",
        "json",
    ]));
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["controls"]["attack_intensity"], 1);
}

#[test]
fn run_mitigated_application_attack_reports_integrity() {
    let out = stdout_of(ctl().args([
        "run",
        "--ticks",
        "10",
        "--attack",
        "--attack-type",
        "l7",
        "--attack-intensity",
        "10",
        "--mitigation",
        "--tier",
        "cluster",
        "--format",
        "json",
    ]));
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["last"]["waf_integrity_percent"], 90);
    assert_eq!(report["last"]["mitigation_active"], true);
    assert_eq!(report["controls"]["capacity_tier"], "standard");
}

#[test]
fn run_replays_csv_scenario() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "at_tick,label,attack_enabled,capacity_tier").unwrap();
    writeln!(file, "5,edge,,ultra").unwrap();
    file.flush().unwrap();

    let out = stdout_of(ctl().args(["run", "--ticks", "10", "--format", "json", "--scenario"]).arg(file.path()));
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["controls"]["capacity_tier"], "ultra");
}

#[test]
fn run_rejects_unknown_scenario_format() {
    ctl()
        .args(["run", "--ticks", "1", "--scenario", "plan.yaml"])
        .assert()
        .failure();
}

#[test]
fn traffic_table_uses_default_intensities() {
    let out = stdout_of(ctl().args(["traffic", "--format", "json"]));
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["intensity"], 1);
    assert_eq!(rows[5]["attack_rps"], 20_000_000.0);
}

#[test]
fn tiers_lists_all_tiers() {
    let out = stdout_of(ctl().arg("tiers"));
    assert!(out.contains("Single VPS"));
    assert!(out.contains("Cluster"));
    assert!(out.contains("Edge Net"));
    assert!(out.contains("10M"));
}

#[test]
fn check_config_accepts_valid_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[simulation]\ntick_rate_hz = 30.0\nrun_for_secs = 5").unwrap();
    file.flush().unwrap();
    let out = stdout_of(ctl().arg("check-config").arg("--config").arg(file.path()));
    assert!(out.contains("configuration OK"));
    assert!(out.contains("30 Hz"));
    assert!(out.contains("5s"));
}

#[test]
fn check_config_rejects_zero_capacity() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[simulation.capacity]\nultra = 0.0").unwrap();
    file.flush().unwrap();
    ctl()
        .arg("check-config")
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure();
}
