//! Integration tests for the config and species subcommands.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_help_lists_subcommands() {
    Command::new(cargo_bin("wildreid"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("species"))
        .stdout(predicate::str::contains("--local-scores"));
}

#[test]
fn test_config_path_with_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");

    Command::new(cargo_bin("wildreid"))
        .arg("config")
        .arg("path")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_reads_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wildreid.toml");
    std::fs::write(&path, "[matching]\nalpha = 0.55\nshortlist_size = 40\n").unwrap();

    Command::new(cargo_bin("wildreid"))
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("0.55"))
        .stdout(predicate::str::contains("40"));
}

#[test]
fn test_config_show_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wildreid.toml");
    std::fs::write(&path, "[matching]\nthreshold = 3.0\n").unwrap();

    Command::new(cargo_bin("wildreid"))
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold"));
}

#[test]
fn test_species_summary() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.csv");
    std::fs::write(
        &metadata,
        "image_id,identity,path,split,dataset,orientation\n\
         1,L1,a.jpg,database,LynxID2025,\n\
         2,,b.jpg,query,LynxID2025,\n\
         3,S1,c.jpg,database,SalamanderID2025,left\n\
         4,,d.jpg,query,SalamanderID2025,right\n",
    )
    .unwrap();

    Command::new(cargo_bin("wildreid"))
        .arg("species")
        .arg("--metadata")
        .arg(&metadata)
        .assert()
        .success()
        .stdout(predicate::str::contains("LynxID2025"))
        .stdout(predicate::str::contains("gamma(0.8)"))
        .stdout(predicate::str::contains("rotate(90)"))
        .stdout(predicate::str::contains("rotate(-90)"));
}

#[test]
fn test_species_rejects_unknown_split() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("metadata.csv");
    std::fs::write(
        &metadata,
        "image_id,identity,path,split,dataset\n1,L1,a.jpg,train,LynxID2025\n",
    )
    .unwrap();

    Command::new(cargo_bin("wildreid"))
        .arg("species")
        .arg("--metadata")
        .arg(&metadata)
        .assert()
        .failure()
        .stderr(predicate::str::contains("train"));
}
