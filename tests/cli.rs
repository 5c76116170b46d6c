//! Smoke tests for the `skyview` binary

use std::process::Command;

fn skyview() -> Command {
    Command::new(env!("CARGO_BIN_EXE_skyview"))
}

#[test]
fn test_cli_help() {
    let output = skyview().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dashboard"));
    assert!(stdout.contains("forecast"));
    assert!(stdout.contains("login"));
}

#[test]
fn test_forecast_requires_coordinates() {
    let output = skyview().args(["forecast", "--lat", "10"]).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--lon"));
}

#[test]
fn test_dashboard_requires_login() {
    let dir = tempfile::tempdir().unwrap();
    let output = skyview()
        .args(["dashboard", "--lat", "51.5", "--lon", "-0.12"])
        .env("SKYVIEW_SESSION_FILE", dir.path().join("role.json"))
        .env("SKYVIEW_ENDPOINTS__BACKEND_URL", "http://127.0.0.1:9")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not logged in"));
}

#[test]
fn test_logout_without_session_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let output = skyview()
        .arg("logout")
        .env("SKYVIEW_SESSION_FILE", dir.path().join("role.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Logged out"));
}
