//! Integration tests for `wheelwright doctor`
//!
//! - Reports each dependency check
//! - JSON output is machine readable
//! - Configuration problems are surfaced

mod common;

use common::TestProject;

#[test]
fn test_doctor_json_lists_checks() {
    let project = TestProject::new();

    let output = project.run(&["--json", "doctor"]);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = json["checks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 4);
    assert!(names.iter().any(|n| n.starts_with("Build tool")));
    assert!(names.iter().any(|n| n.starts_with("Ninja")));
    assert!(names.iter().any(|n| n.starts_with("Fortran compiler")));
    assert!(names.iter().any(|n| n.starts_with("C compiler")));
    assert!(json["cpus"].as_u64().unwrap() >= 1);
}

#[test]
fn test_doctor_fails_when_build_tool_missing() {
    let project = TestProject::new();
    project.create_file("wheelwright.toml", "[build]\ntool = \"wheelwright-no-such-meson\"\n");

    let output = project.run(&["--json", "doctor"]);

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    let tool = json["checks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Build tool")
        .unwrap();
    assert_eq!(tool["passed"], false);
    assert!(tool["suggestion"].as_str().unwrap().contains("meson"));
}

#[test]
fn test_doctor_reports_config_issues() {
    let project = TestProject::new();
    project.create_file("wheelwright.toml", "[build]\njobs = 0\n");

    let output = project.run(&["--json", "doctor"]);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let issues = json["config_issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].as_str().unwrap().contains("build.jobs"));
}

#[test]
fn test_doctor_human_output() {
    let project = TestProject::new();

    let output = project.run(&["doctor"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Checking native build dependencies"));
    assert!(stdout.contains("CPU(s)"));
}
