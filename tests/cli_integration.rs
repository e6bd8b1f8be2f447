//! CLI integration tests for Gangway.
//!
//! These exercise the pipeline's pre-build stages, which behave the same on
//! any machine regardless of which wasm tools are installed.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the gangway binary command.
fn gangway() -> Command {
    Command::cargo_bin("gangway").unwrap()
}

#[test]
fn test_doctor_reports_all_tools() {
    gangway()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("wasm-pack"))
        .stdout(predicate::str::contains("cargo"))
        .stdout(predicate::str::contains("wasm-bindgen"));
}

#[test]
fn test_build_rejects_non_cdylib_crate() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("Cargo.toml"),
        "[package]\nname = \"app\"\nversion = \"0.1.0\"\n\n[lib]\ncrate-type = [\"rlib\"]\n",
    )
    .unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    let asset = src.join("lib.rs");
    fs::write(&asset, "").unwrap();

    gangway()
        .args(["build", asset.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cdylib"));
}

#[test]
fn test_build_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();
    // node_modules bounds the upward probe inside the fixture.
    let src = tmp.path().join("node_modules/dep/src");
    fs::create_dir_all(&src).unwrap();
    let asset = src.join("lib.rs");
    fs::write(&asset, "").unwrap();

    gangway()
        .args(["build", asset.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cargo.toml"));
}

#[test]
fn test_build_rejects_unknown_profile() {
    gangway()
        .args(["build", "lib.rs", "--profile", "fast"])
        .assert()
        .failure();
}
