//! Integration tests for the ym CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a ym command isolated from the user's config and environment
fn ym(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ym").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("YM_MODEL")
        .env_remove("YM_ALPHA")
        .env_remove("YM_WAFER_COST")
        .env_remove("YM_FAB_UTILIZATION")
        .env_remove("YM_FORMAT");
    cmd
}

/// Run a command and parse its stdout as JSON
fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("wafer yield"))
        .stdout(predicate::str::contains("calc"))
        .stdout(predicate::str::contains("sweep"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ym"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp).arg("polish").assert().failure();
}

// ============================================================================
// Calc Command Tests
// ============================================================================

#[test]
fn test_calc_reference_scenario() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .arg("calc")
        .assert()
        .success()
        .stdout(predicate::str::contains("60.65%"))
        .stdout(predicate::str::contains("428"))
        .stdout(predicate::str::contains("706"));
}

#[test]
fn test_calc_json_output() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args(["calc", "-f", "json"]));

    let summary = &json["summary"];
    assert_eq!(summary["model"], "poisson");
    assert_eq!(summary["total_dies"], 706);
    assert_eq!(summary["good_dies"], 428);
    let y = summary["yield_rate"].as_f64().unwrap();
    assert!((y - (-0.5f64).exp()).abs() < 1e-12);
    assert!(summary.get("cost_per_good_die").is_none());
    assert_eq!(json["scenario"]["diameter_mm"], 300.0);
}

#[test]
fn test_calc_negative_binomial() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args(["calc", "--model", "nb", "--alpha", "2", "-f", "json"]));
    let y = json["summary"]["yield_rate"].as_f64().unwrap();
    assert!((y - 0.64).abs() < 1e-12);
    assert_eq!(json["summary"]["good_dies"], 451);
}

#[test]
fn test_calc_murphy() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args(["calc", "-m", "murphy", "-f", "json"]));
    let y = json["summary"]["yield_rate"].as_f64().unwrap();
    assert!((y - 4.0 / 9.0).abs() < 1e-12);
    assert_eq!(json["summary"]["good_dies"], 313);
}

#[test]
fn test_calc_with_cost_and_repair() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args([
        "calc",
        "--wafer-cost",
        "5000",
        "--fab-utilization",
        "0.8",
        "--repair",
        "20",
        "-f",
        "json",
    ]));
    let cpgd = json["summary"]["cost_per_good_die"].as_f64().unwrap();
    assert!((cpgd - 6250.0 / 428.0).abs() < 1e-9);
    let eff = json["summary"]["effective_yield"].as_f64().unwrap();
    assert!((eff - (-0.4f64).exp()).abs() < 1e-12);
}

#[test]
fn test_calc_degenerate_wafer() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args([
        "calc",
        "--diameter",
        "10",
        "--edge-exclusion",
        "5",
        "--wafer-cost",
        "1000",
        "-f",
        "json",
    ]));
    assert_eq!(json["summary"]["total_dies"], 0);
    assert_eq!(json["summary"]["good_dies"], 0);
    assert_eq!(json["summary"]["efficiency"], 0.0);
    assert_eq!(json["summary"]["cost_per_good_die"], 0.0);
}

#[test]
fn test_calc_accepts_negative_density() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args(["calc", "--d0", "-0.5", "-f", "json"]));
    let y = json["summary"]["yield_rate"].as_f64().unwrap();
    assert!(y > 1.0);
    assert!((y - 0.5f64.exp()).abs() < 1e-12);
}

#[test]
fn test_calc_negative_repair_means_no_repair() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args(["calc", "--repair", "-10", "-f", "json"]));
    let summary = &json["summary"];
    assert_eq!(summary["effective_yield"], summary["yield_rate"]);
}

#[test]
fn test_calc_warns_on_degenerate_wafer() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["calc", "--diameter", "10", "--edge-exclusion", "5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no usable area"));
}

#[test]
fn test_calc_csv_output() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["calc", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("metric,value\n"))
        .stdout(predicate::str::contains("total_dies,706"))
        .stdout(predicate::str::contains("good_dies,428"));
}

#[test]
fn test_calc_markdown_output() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["calc", "-f", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Metric"))
        .stdout(predicate::str::contains("60.65%"));
}

#[test]
fn test_unknown_model_warns_and_yields_zero() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["calc", "--model", "bose", "-f", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown yield model"))
        .stdout(predicate::str::contains("\"yield_rate\": 0.0"))
        .stdout(predicate::str::contains("\"good_dies\": 0"));
}

#[test]
fn test_quiet_suppresses_warning() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["calc", "--model", "bose", "-q"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

// ============================================================================
// Scenario File and Config Tests
// ============================================================================

#[test]
fn test_calc_from_params_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("fab.yaml"),
        "diameter_mm: 200\ndie_area_mm2: 50\nd0: 0.2\nmodel: murphy\n",
    )
    .unwrap();

    let json = json_output(ym(&tmp).args(["calc", "--params", "fab.yaml", "-f", "json"]));
    assert_eq!(json["summary"]["model"], "murphy");
    // floor(pi * 100^2 / 50) = 628
    assert_eq!(json["summary"]["total_dies"], 628);
}

#[test]
fn test_flags_override_params_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("fab.yaml"), "d0: 0.2\nmodel: murphy\n").unwrap();

    let json = json_output(ym(&tmp).args([
        "calc", "--params", "fab.yaml", "--model", "poisson", "-f", "json",
    ]));
    assert_eq!(json["summary"]["model"], "poisson");
    assert_eq!(json["scenario"]["d0"], 0.2);
}

#[test]
fn test_invalid_params_file_reports_yaml_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.yaml"), "d0: [unclosed\n").unwrap();

    ym(&tmp)
        .args(["calc", "--params", "bad.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YAML"));
}

#[test]
fn test_non_mapping_params_file_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("list.yaml"), "- d0: 0.2\n- d0: 0.3\n").unwrap();

    ym(&tmp)
        .args(["calc", "--params", "list.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid YAML"));
}

#[test]
fn test_missing_params_file_fails() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["calc", "--params", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.yaml"));
}

#[test]
fn test_project_config_sets_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".ym")).unwrap();
    fs::write(
        tmp.path().join(".ym/config.yaml"),
        "model: murphy\nwafer_cost: 4000\n",
    )
    .unwrap();

    let json = json_output(ym(&tmp).args(["calc", "-f", "json"]));
    assert_eq!(json["summary"]["model"], "murphy");
    assert!(json["summary"]["cost_per_good_die"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_env_overrides_config() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".ym")).unwrap();
    fs::write(tmp.path().join(".ym/config.yaml"), "model: murphy\n").unwrap();

    let json = json_output(ym(&tmp).env("YM_MODEL", "nb").args(["calc", "-f", "json"]));
    assert_eq!(json["summary"]["model"], "nb");
}

#[test]
fn test_config_default_format() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .env("YM_FORMAT", "csv")
        .arg("calc")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("metric,value"));
}

#[test]
fn test_config_keys_and_show() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("map_columns"));

    ym(&tmp)
        .env("YM_WAFER_COST", "7500")
        .args(["config", "show", "wafer_cost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7500"));

    ym(&tmp)
        .args(["config", "show", "colour"])
        .assert()
        .failure();
}

#[test]
fn test_config_path() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Global:"))
        .stdout(predicate::str::contains("Project:"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_scenario() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["init", "wafer.yaml", "--d0", "0.3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created scenario"));

    let content = fs::read_to_string(tmp.path().join("wafer.yaml")).unwrap();
    assert!(content.contains("d0: 0.3"));

    let json = json_output(ym(&tmp).args(["calc", "--params", "wafer.yaml", "-f", "json"]));
    assert_eq!(json["scenario"]["d0"], 0.3);
    assert_eq!(json["summary"]["total_dies"], 706);
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp).arg("init").assert().success();
    assert!(tmp.path().join("scenario.yaml").exists());

    ym(&tmp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ym(&tmp).args(["init", "--force"]).assert().success();
}

// ============================================================================
// Compare and Sweep Tests
// ============================================================================

#[test]
fn test_compare_lists_all_models() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .arg("compare")
        .assert()
        .success()
        .stdout(predicate::str::contains("Poisson"))
        .stdout(predicate::str::contains("Murphy"))
        .stdout(predicate::str::contains("Negative Binomial"));
}

#[test]
fn test_compare_json() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args(["compare", "-f", "json"]));
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["model"], "poisson");
    assert_eq!(rows[1]["model"], "murphy");
    assert_eq!(rows[2]["model"], "nb");
    assert_eq!(rows[2]["good_dies"], 451);
}

#[test]
fn test_sweep_csv() {
    let tmp = TempDir::new().unwrap();
    let output = ym(&tmp)
        .args([
            "sweep", "--over", "d0", "--from", "0", "--to", "1", "--steps", "3", "-f", "csv",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "d0,poisson,murphy,negative_binomial,gross_dies,good_dies"
    );
    assert_eq!(lines[1], "0,1,1,1,706,706");
    assert!(lines[3].starts_with("1,"));
}

#[test]
fn test_sweep_die_area_json() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args([
        "sweep", "--over", "die-area", "--from", "50", "--to", "200", "--steps", "4", "-f",
        "json",
    ]));
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[0]["value"], 50.0);
    assert_eq!(points[3]["value"], 200.0);
    assert!(points[0]["gross_dies"].as_u64() > points[3]["gross_dies"].as_u64());
}

#[test]
fn test_sweep_zero_steps_fails() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["sweep", "--over", "d0", "--from", "0", "--to", "1", "--steps", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--steps"));
}

#[test]
fn test_sweep_step_limit() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args([
            "sweep",
            "--over",
            "d0",
            "--from",
            "0",
            "--to",
            "1",
            "--steps",
            "18446744073709551615",
            "-f",
            "csv",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("exceeds the limit"));
}

#[test]
fn test_sweep_negative_range() {
    let tmp = TempDir::new().unwrap();
    let output = ym(&tmp)
        .args([
            "sweep", "--over", "d0", "--from", "-1", "--to", "0", "--steps", "3", "-f", "csv",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("-1,"));
    assert!(lines[3].starts_with("0,"));
}

// ============================================================================
// Map Command Tests
// ============================================================================

#[test]
fn test_map_seeded_is_reproducible() {
    let tmp = TempDir::new().unwrap();
    let first = ym(&tmp).args(["map", "--seed", "7"]).output().unwrap();
    let second = ym(&tmp).args(["map", "--seed", "7"]).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert!(String::from_utf8_lossy(&first.stdout).contains("of 716 sites"));
}

#[test]
fn test_map_perfect_yield_json() {
    let tmp = TempDir::new().unwrap();
    let json = json_output(ym(&tmp).args(["map", "--d0", "0", "-f", "json"]));
    assert_eq!(json["columns"], 30);
    assert_eq!(json["good"], 716);
    assert_eq!(json["bad"], 0);
    assert_eq!(json["dies"].as_array().unwrap().len(), 716);
}

#[test]
fn test_map_too_wide_for_terminal() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["map", "--max-columns", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-columns"));
}

#[test]
fn test_map_grid_limit() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["map", "--die-area", "0.01", "-f", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit 2000"));
}

// ============================================================================
// Report and Completions Tests
// ============================================================================

#[test]
fn test_report_to_file() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["report", "--output", "yield.md", "--wafer-cost", "5000"])
        .assert()
        .success();

    let report = fs::read_to_string(tmp.path().join("yield.md")).unwrap();
    assert!(report.starts_with("# Wafer Yield Report"));
    assert!(report.contains("## Model Comparison"));
    assert!(report.contains("Cost per good die"));
}

#[test]
fn test_report_to_stdout() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["report", "--title", "Line 3 Review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Line 3 Review"))
        .stdout(predicate::str::contains("## Defect Density Sensitivity"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    ym(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_ym"));
}
