//! Integration tests for the seoul-explorer CLI

use std::path::Path;
use std::process::{Command, Output};

fn explorer(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_seoul-explorer"));
    command
        .arg("--config")
        .arg(config_dir.join("missing.toml"))
        .env_remove("SEOUL_EXPLORER_GEOCODING__API_KEY")
        .env_remove("RUST_LOG");
    command
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Test that the CLI shows help with explicit help flag
#[test]
fn test_cli_help() {
    let dir = tempfile::tempdir().unwrap();
    let output = explorer(dir.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Discover Seoul landmarks"));
    assert!(stdout.contains("nearby"));
    assert!(stdout.contains("track"));
}

#[test]
fn test_landmarks_lists_catalog_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let output = explorer(dir.path()).arg("landmarks").output().unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].starts_with("naksan-park"));
    assert!(lines[7].starts_with("samsung-station"));
}

#[test]
fn test_landmarks_category_filter() {
    let dir = tempfile::tempdir().unwrap();
    let output = explorer(dir.path())
        .args(["landmarks", "--category", "modern"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.contains("Jayang Station"));

    let unknown = explorer(dir.path())
        .args(["landmarks", "--category", "beaches"])
        .output()
        .unwrap();
    assert!(!unknown.status.success());
}

#[test]
fn test_show_landmark_details() {
    let dir = tempfile::tempdir().unwrap();
    let output = explorer(dir.path())
        .args(["show", "namsan-tower"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("N Seoul Tower"));
    assert!(stdout.contains(
        "Directions: https://maps.google.com/maps?daddr=37.5512,126.9882&dirflg=w"
    ));

    let missing = explorer(dir.path()).args(["show", "gyeongbokgung"]).output().unwrap();
    assert!(!missing.status.success());
}

#[test]
fn test_nearby_ranks_from_city_center() {
    let dir = tempfile::tempdir().unwrap();
    let output = explorer(dir.path())
        .args(["nearby", "--lat", "37.5665", "--lng", "126.9780"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "1. Myeong-dong - 0.5 km");
}

#[test]
fn test_nearby_rejects_invalid_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let output = explorer(dir.path())
        .args(["nearby", "--lat", "137.0", "--lng", "126.9780"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_favorites_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("favorites");
    let run = |args: &[&str]| {
        explorer(dir.path())
            .env("SEOUL_EXPLORER_STORAGE__FAVORITES_PATH", &store)
            .args(args)
            .output()
            .unwrap()
    };

    assert!(run(&["favorites", "add", "bukchon-hanok"]).status.success());
    assert!(run(&["favorites", "add", "namsan-tower"]).status.success());
    assert!(!run(&["favorites", "add", "not-a-landmark"]).status.success());

    let listed = stdout_of(&run(&["favorites", "list"]));
    let lines: Vec<&str> = listed.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("bukchon-hanok"));
    assert!(lines[1].starts_with("namsan-tower"));

    assert!(run(&["favorites", "remove", "bukchon-hanok"]).status.success());
    let listed = stdout_of(&run(&["favorites", "list"]));
    assert_eq!(listed.lines().count(), 1);
}

#[test]
fn test_track_reports_position_and_label() {
    let dir = tempfile::tempdir().unwrap();
    let output = explorer(dir.path())
        .args(["track", "--lat", "37.5512", "--lng", "126.9882", "--seconds", "1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Status: Getting your location..."));
    assert!(stdout.contains("1. N Seoul Tower - 0.0 km"));
    assert!(stdout.contains("Location: Seoul, Jung-gu"));
    assert!(stdout.contains("Showing: Seoul, Jung-gu"));
}
