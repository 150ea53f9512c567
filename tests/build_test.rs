//! Integration tests for `wheelwright build`
//!
//! Drive the real binary against a shell stand-in for Meson:
//! - Extension placed into every canonical destination
//! - Object directories next to the module are not placed
//! - Failing stages exit non-zero and name the stage
//! - Toolchain variables reach the build tool

#![cfg(unix)]

mod common;

use assert_fs::prelude::*;
use common::{install_fake_meson, TestProject, BUILT_MODULE, SAMPLE_CONFIG};
use predicates::prelude::*;

const TAG_ARGS: [&str; 6] = [
    "--python-version",
    "3.10",
    "--platform",
    "linux",
    "--machine",
    "x86_64",
];

fn build_args<'a>(meson: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["build", "--build-tool", meson];
    args.extend_from_slice(&TAG_ARGS);
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_build_places_module_into_canonical_targets() {
    let project = TestProject::new();
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let output = project.run(&build_args(meson, &[]));

    assert!(
        output.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    for dir in [
        "ccblade",
        "build/lib.linux-x86_64-cpython-310/ccblade",
        "build/bdist.linux-x86_64/wheel/ccblade",
    ] {
        assert!(
            project.file_exists(&format!("{dir}/{BUILT_MODULE}")),
            "missing module in {dir}"
        );
        assert!(!project.file_exists(&format!("{dir}/_bem.so.p")));
    }
    assert_eq!(project.read_file(&format!("ccblade/{BUILT_MODULE}")), "ELF extension\n");
}

#[test]
fn test_build_honors_config_file_targets() {
    let project = TestProject::new();
    project.create_file("wheelwright.toml", SAMPLE_CONFIG);
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let output = project.run(&build_args(meson, &["--no-build-cache", "--no-wheel-staging"]));

    assert!(output.status.success());
    let root = assert_fs::fixture::ChildPath::new(project.path());
    root.child("ccblade").child(BUILT_MODULE).assert(predicate::path::is_file());
    root.child("dist/native").child(BUILT_MODULE).assert(predicate::path::is_file());
    root.child("build/bdist.linux-x86_64").assert(predicate::path::missing());
}

#[test]
fn test_build_json_output_lists_placed_files() {
    let project = TestProject::new();
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let mut args = vec!["--json"];
    args.extend(build_args(meson, &[]));
    let output = project.run(&args);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "success");
    assert_eq!(json["tool_version"], "1.4.0");
    assert_eq!(json["placed"].as_array().unwrap().len(), 3);
    assert!(json["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn test_compile_failure_reports_stage_and_output() {
    let project = TestProject::new();
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let mut args = vec!["--json"];
    args.extend(build_args(meson, &[]));
    let output = project.run_with_env(&args, &[("FAKE_MESON_FAIL", "compile")]);

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["stage"], "compile");
    assert!(json["cause"]
        .as_str()
        .unwrap()
        .contains("undefined reference to bem_"));
    assert!(!project.file_exists(&format!("ccblade/{BUILT_MODULE}")));
}

#[test]
fn test_setup_failure_is_configure_stage() {
    let project = TestProject::new();
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let output = project.run_with_env(&build_args(meson, &[]), &[("FAKE_MESON_FAIL", "setup")]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stage 'configure'"), "stderr: {stderr}");
}

#[test]
fn test_no_artifact_is_reported() {
    let project = TestProject::new();
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let output = project.run_with_env(&build_args(meson, &[]), &[("FAKE_MESON_EMPTY", "1")]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-artifact"), "stderr: {stderr}");
    assert!(stderr.contains("_bem"));
}

#[test]
fn test_missing_build_tool() {
    let project = TestProject::new();

    let output = project.run(&build_args("/nonexistent/meson", &[]));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tool-missing"), "stderr: {stderr}");
    assert!(!project.file_exists("meson_build"));
}

#[test]
fn test_toolchain_variables_reach_build_tool() {
    let project = TestProject::new();
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();
    let log = tools.child("meson.log");

    let output = project.run_with_env(
        &build_args(meson, &["--fc", "flang-new"]),
        &[
            ("FAKE_MESON_LOG", log.path().to_str().unwrap()),
            ("CC", "clang"),
            ("MESON_ARGS", "-Dbuildtype=debug"),
        ],
    );

    assert!(output.status.success());
    log.assert(predicate::str::contains("FC=flang-new CC=clang"));
    log.assert(predicate::str::contains("-Dbuildtype=debug"));
    log.assert(predicate::str::contains("install -C"));
}

#[test]
fn test_managed_option_in_meson_args_rejected() {
    let project = TestProject::new();
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let output = project.run_with_env(&build_args(meson, &[]), &[("MESON_ARGS", "--prefix=/usr")]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--prefix"));
}

#[test]
fn test_rebuild_discards_stale_staging_content() {
    let project = TestProject::new();
    project.create_file("meson_build/ccblade/_bem.cpython-39-x86_64-linux-gnu.so", "stale");
    let tools = assert_fs::TempDir::new().unwrap();
    let meson = install_fake_meson(tools.path());
    let meson = meson.to_str().unwrap();

    let output = project.run(&build_args(meson, &["--no-build-cache", "--no-wheel-staging"]));

    assert!(output.status.success());
    assert!(!project.file_exists("ccblade/_bem.cpython-39-x86_64-linux-gnu.so"));
    assert!(project.file_exists(&format!("ccblade/{BUILT_MODULE}")));
}
