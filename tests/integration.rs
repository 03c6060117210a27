use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> (bool, String, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_xrisk"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str = String::from_utf8(output.stdout).expect("failed to convert stdout to string");
    let stderr_str = String::from_utf8(output.stderr).expect("failed to convert stderr to string");

    (output.status.success(), stdout_str, stderr_str)
}

fn run_bin_ok(args: &[&str]) -> serde_json::Value {
    let (success, stdout_str, stderr_str) = run_bin(args);
    assert!(
        success,
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
    serde_json::from_str(&stdout_str).expect("failed to parse stdout as JSON")
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[sampling]\n"
        + "n_trials = 20000\n"
        + "delta0 = [ 0.0, 0.02,]\n"
        + "phi = [ 0.0, 1.0,]\n"
        + "xi = [ 0.0, 0.99,]\n"
        + "value_of_life = [ 90.0, 270.0,]\n"
        + "period = [ 5.0, 20.0,]\n"
        + "seed = 1234\n"
        + "\n"
        + "[payoff]\n"
        + "n_points = 200\n"
        + "\n"
        + "[output]\n"
        + "hist_bins = 10\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let calibration = run_bin_ok(&["--config", config_str, "calibration"]);
    assert_eq!(calibration["sampling"]["n_trials"], 20000);
    assert_eq!(calibration["payoff"]["n_points"], 200);

    let simulation = run_bin_ok(&["--config", config_str, "simulate"]);
    assert_eq!(simulation["n_trials"], 20000);
    assert_eq!(simulation["seed"], 1234);
    let frac_positive = simulation["summary"]["frac_positive"]
        .as_f64()
        .expect("frac_positive is a number");
    assert!(frac_positive > 0.0 && frac_positive < 1.0);
    let counts = simulation["histogram"]["counts"]
        .as_array()
        .expect("counts is an array");
    assert_eq!(counts.len(), 10);
    let total: u64 = counts.iter().filter_map(|count| count.as_u64()).sum();
    assert_eq!(total, 20000);

    let replay = run_bin_ok(&["--config", config_str, "simulate"]);
    assert_eq!(simulation, replay);

    let reseeded = run_bin_ok(&[
        "--config",
        config_str,
        "simulate",
        "--n-trials",
        "5000",
        "--seed",
        "7",
    ]);
    assert_eq!(reseeded["n_trials"], 5000);
    assert_eq!(reseeded["seed"], 7);

    let payoff = run_bin_ok(&["--config", config_str, "payoff"]);
    let points = payoff["points"].as_array().expect("points is an array");
    assert_eq!(points.len(), 200);
    assert!(points.iter().all(|point| point["payoff"].is_f64()));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn score_calibration_point() {
    let score = run_bin_ok(&[
        "score",
        "--delta0-pct",
        "1.0",
        "--phi",
        "0.5",
        "--xi",
        "0.5",
    ]);
    let share = score["share"].as_f64().expect("share is a number");
    assert!((share - 0.6139).abs() < 1e-3);

    let clipped = run_bin_ok(&[
        "score",
        "--delta0-pct",
        "0.0",
        "--phi",
        "0.5",
        "--xi",
        "0.01",
        "--period",
        "5",
    ]);
    assert_eq!(clipped["share"].as_f64(), Some(0.0));
}

#[test]
fn rejects_invalid_input() {
    let (success, _, _) = run_bin(&["simulate", "--n-trials", "0"]);
    assert!(!success);

    let (success, _, _) = run_bin(&["score", "--delta0-pct", "3.0", "--phi", "0.5", "--xi", "0.5"]);
    assert!(!success);

    let (success, _, _) = run_bin(&["--config", "/nonexistent/config.toml", "payoff"]);
    assert!(!success);
}
