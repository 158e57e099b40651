//! End-to-end tests for the `cnab-deps` binary.

use assert_cmd::Command;
use cnab_deps::test_utils::BundleFixture;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

/// Command isolated from the user's config file, log settings, and colors.
fn cnab_deps(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cnab-deps").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(temp.path().join("config.toml"));
    cmd
}

#[test]
fn test_check_with_dependencies() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::with_db_and_cache().write_to(temp.path()).unwrap();

    cnab_deps(&temp)
        .arg("check")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("myapp v0.1.0 declares dependencies (io.cnab.dependencies)"));
}

#[test]
fn test_check_without_dependencies() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("plain").write_to(temp.path()).unwrap();

    cnab_deps(&temp)
        .arg("check")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("plain v0.1.0 declares no dependencies"));
}

#[test]
fn test_check_omits_invalid_version() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("plain").version("latest").write_to(temp.path()).unwrap();

    cnab_deps(&temp)
        .arg("check")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("- plain declares no dependencies"));
}

#[test]
fn test_check_missing_bundle_fails() {
    let temp = TempDir::new().unwrap();

    cnab_deps(&temp)
        .arg("check")
        .arg(temp.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("bundle file not found"));
}

#[test]
fn test_list_follows_sequence() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("myapp")
        .sequence(&["b", "a"])
        .requires("a", "example.com/a:1.0")
        .requires("b", "example.com/b:1.0")
        .write_to(temp.path())
        .unwrap();

    let output = cnab_deps(&temp)
        .arg("list")
        .arg(&bundle)
        .args(["--installation", "prod"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("Installation order for myapp v0.1.0 (declared sequence):"), "{stdout}");
    let first = stdout.find("1. b -> example.com/b:1.0 as prod-b").expect(&stdout);
    let second = stdout.find("2. a -> example.com/a:1.0 as prod-a").expect(&stdout);
    assert!(first < second);
}

#[test]
fn test_list_json_output() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::with_db_and_cache().write_to(temp.path()).unwrap();

    let output = cnab_deps(&temp)
        .arg("list")
        .arg(&bundle)
        .args(["--format", "json", "-i", "myapp"])
        .assert()
        .success();

    let rows: Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(
        rows,
        json!([
            {
                "name": "db",
                "bundle": "example.com/db:1.0",
                "ranges": ["1.x"],
                "prereleases": false,
                "installation": "myapp-db"
            },
            {
                "name": "cache",
                "bundle": "example.com/cache:2.0",
                "prereleases": false,
                "installation": "myapp-cache"
            }
        ])
    );
}

#[test]
fn test_list_sorts_unsequenced_when_configured() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "sort_unsequenced = true\n").unwrap();
    let bundle = BundleFixture::new("myapp")
        .sequence(&["c"])
        .requires("c", "example.com/c:1.0")
        .requires("a", "example.com/a:1.0")
        .requires("b", "example.com/b:1.0")
        .write_to(temp.path())
        .unwrap();

    let output = cnab_deps(&temp)
        .arg("list")
        .arg(&bundle)
        .args(["--format", "json"])
        .assert()
        .success();

    let rows: Vec<Value> = serde_json::from_slice(&output.get_output().stdout).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_list_uses_configured_installation() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "installation = \"staging\"\n").unwrap();
    let bundle = BundleFixture::new("myapp")
        .requires("db", "example.com/db:1.0")
        .write_to(temp.path())
        .unwrap();

    cnab_deps(&temp)
        .arg("list")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("as staging-db"));
}

#[test]
fn test_list_without_dependencies() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("plain").write_to(temp.path()).unwrap();

    cnab_deps(&temp)
        .arg("list")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("plain v0.1.0 declares no dependencies"));

    cnab_deps(&temp)
        .arg("list")
        .arg(&bundle)
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_list_malformed_payload_fails() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("bad")
        .raw_dependencies(json!({ "requires": "db" }))
        .write_to(temp.path())
        .unwrap();

    cnab_deps(&temp)
        .arg("list")
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not unmarshal the dependencies extension data"));
}

#[test]
fn test_show_prints_typed_extension() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::with_db_and_cache().write_to(temp.path()).unwrap();

    let output = cnab_deps(&temp).arg("show").arg(&bundle).assert().success();

    let shown: Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(shown["sequence"], json!(["db", "cache"]));
    assert_eq!(shown["requires"]["db"]["version"], json!({ "ranges": ["1.x"], "prereleases": false }));
    assert_eq!(shown["requires"]["cache"]["bundle"], json!("example.com/cache:2.0"));
}

#[test]
fn test_show_without_extension_fails() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("plain").write_to(temp.path()).unwrap();

    cnab_deps(&temp)
        .arg("show")
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("none is defined"));
}

#[test]
fn test_extensions_supported() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::with_db_and_cache()
        .required_extension("io.cnab.dependencies")
        .write_to(temp.path())
        .unwrap();

    cnab_deps(&temp)
        .arg("extensions")
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("io.cnab.dependencies (dependencies)"));
}

#[test]
fn test_extensions_unsupported_fails() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("myapp")
        .required_extension("io.cnab.dependencies")
        .required_extension("io.cnab.docker")
        .write_to(temp.path())
        .unwrap();

    cnab_deps(&temp)
        .arg("extensions")
        .arg(&bundle)
        .assert()
        .failure()
        .stdout(predicate::str::contains("io.cnab.docker (unsupported)"))
        .stderr(predicate::str::contains("extension 'io.cnab.docker' is not supported"));
}

#[test]
fn test_extensions_several_unsupported_fails() {
    let temp = TempDir::new().unwrap();
    let bundle = BundleFixture::new("myapp")
        .required_extension("io.cnab.docker")
        .required_extension("io.cnab.status")
        .write_to(temp.path())
        .unwrap();

    cnab_deps(&temp)
        .arg("extensions")
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "extensions are not supported: io.cnab.docker, io.cnab.status",
        ));
}

#[test]
fn test_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "sort_unsequenced = [").unwrap();
    let bundle = BundleFixture::new("plain").write_to(temp.path()).unwrap();

    cnab_deps(&temp)
        .arg("check")
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
