//! Command-line surface tests for pinbump
//!
//! None of these reach the network: each case stops before version resolution.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const MANIFEST: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="CounterStrikeSharp.API" Version="1.0.140" />
  </ItemGroup>
</Project>
"#;

fn pinbump() -> Command {
    let mut cmd = Command::cargo_bin("pinbump").unwrap();
    cmd.env_remove("PINBUMP_MANIFEST")
        .env_remove("PINBUMP_PACKAGE")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_flags_and_exits_zero() {
    pinbump()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--check-only"))
        .stdout(predicate::str::contains("--update-to-latest"))
        .stdout(predicate::str::contains("--target-version"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn missing_manifest_exits_one() {
    let dir = tempdir().unwrap();
    pinbump()
        .arg("--path")
        .arg(dir.path())
        .arg("--check-only")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("csproj"));
}

#[test]
fn malformed_target_version_exits_one_without_changes() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("Plugin.csproj");
    fs::write(&manifest, MANIFEST).unwrap();

    pinbump()
        .arg("--path")
        .arg(dir.path())
        .args(["--target-version", "next"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid input"));

    assert_eq!(fs::read_to_string(&manifest).unwrap(), MANIFEST);
    assert!(!dir.path().join("Plugin.csproj.backup").exists());
}

#[test]
fn invalid_endpoint_exits_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Plugin.csproj"), MANIFEST).unwrap();

    pinbump()
        .arg("--path")
        .arg(dir.path())
        .args(["--check-only", "--github-api", "ftp://example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported endpoint scheme"));
}
