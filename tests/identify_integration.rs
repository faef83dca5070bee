//! End-to-end tests for identification runs.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const METADATA: &str = "\
image_id,identity,path,split,dataset
d1,A,images/d1.jpg,database,LynxID2025
d2,B,images/d2.jpg,database,LynxID2025
d3,C,images/d3.jpg,database,LynxID2025
q1,,images/q1.jpg,query,LynxID2025
t1,,images/t1.jpg,query,SeaTurtleID2022
q2,,images/q2.jpg,query,LynxID2025
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(embeddings: &str) -> Self {
        Self::with_metadata(METADATA, embeddings)
    }

    fn with_metadata(metadata: &str, embeddings: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("metadata.csv"), metadata).unwrap();
        std::fs::write(dir.path().join("embeddings.csv"), embeddings).unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("wildreid"));
        cmd.arg("--config")
            .arg(self.path("config.toml"))
            .arg("--metadata")
            .arg(self.path("metadata.csv"))
            .arg("--embeddings")
            .arg(self.path("embeddings.csv"))
            .arg("-o")
            .arg(self.path("submission.csv"))
            .arg("--no-progress");
        cmd
    }

    fn submission(&self) -> String {
        read(&self.path("submission.csv"))
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn standard_embeddings() -> &'static str {
    "\
d1,1,0,0,0
d2,0,1,0,0
d3,0,0,1,0
q1,0,2,0,0
t1,0,0,0.9,0.1
q2,0,0,0,1
"
}

#[test]
fn test_global_only_identification() {
    let fixture = Fixture::new(standard_embeddings());

    fixture
        .command()
        .args(["--alpha", "1", "-t", "0.5", "-k", "2", "--no-query-expansion"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Complete:"))
        .stderr(predicate::str::contains("s matching)"));

    assert_eq!(
        fixture.submission(),
        "image_id,identity\nq1,B\nq2,new_individual\nt1,C\n"
    );
}

#[test]
fn test_local_scores_change_the_decision() {
    let fixture = Fixture::new(
        "\
d1,1,0,0,0
d2,0,1,0,0
d3,0,0,1,0
q1,0.6,0.8,0,0
t1,0,0,0.9,0.1
q2,0,0,0,1
",
    );
    let scores = fixture.write(
        "local.csv",
        "query_id,database_id,score\nq1,d1,1.0\nq1,d2,0.0\n",
    );

    fixture
        .command()
        .args(["--alpha", "0.5", "-t", "0.3", "-k", "2", "--no-query-expansion"])
        .arg("--local-scores")
        .arg(&scores)
        .assert()
        .success();

    assert_eq!(
        fixture.submission(),
        "image_id,identity\nq1,A\nq2,new_individual\nt1,C\n"
    );
}

#[test]
fn test_parallel_run_matches_sequential() {
    let fixture = Fixture::new(standard_embeddings());
    let scores = fixture.write(
        "local.csv",
        "query_id,database_id,score\nq1,d2,0.9\nt1,d3,0.7\nq2,d1,0.1\n",
    );

    fixture
        .command()
        .args(["--alpha", "0.6", "-t", "0.4"])
        .arg("--local-scores")
        .arg(&scores)
        .assert()
        .success();
    let sequential = fixture.submission();

    fixture
        .command()
        .args(["--alpha", "0.6", "-t", "0.4", "--max-parallel", "3"])
        .arg("--local-scores")
        .arg(&scores)
        .assert()
        .success();

    assert_eq!(fixture.submission(), sequential);
}

#[test]
fn test_missing_embeddings_are_skipped() {
    let fixture = Fixture::new(
        "\
d1,1,0,0,0
d2,0,1,0,0
d3,0,0,1,0
q1,0,2,0,0
",
    );

    fixture
        .command()
        .args(["--alpha", "1", "-t", "0.5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("t1"));

    assert_eq!(fixture.submission(), "image_id,identity\nq1,B\n");
}

#[test]
fn test_calibration_moves_decision_below_threshold() {
    // Two individuals with two images each. Same-individual pairs score 0.8,
    // different-individual pairs at most 0.6, so the fitted map sends 0.65 to
    // roughly 0.25.
    let fixture = Fixture::with_metadata(
        "\
image_id,identity,path,split,dataset
d1,A,images/d1.jpg,database,LynxID2025
d2,A,images/d2.jpg,database,LynxID2025
d3,B,images/d3.jpg,database,LynxID2025
d4,B,images/d4.jpg,database,LynxID2025
q1,,images/q1.jpg,query,LynxID2025
q2,,images/q2.jpg,query,LynxID2025
",
        "\
d1,1,0
d2,0.8,0.6
d3,0,1
d4,-0.6,0.8
q1,0.65,-0.76
q2,0.8,0.6
",
    );
    let args = ["--alpha", "1", "-t", "0.5", "--no-query-expansion"];

    fixture.command().args(args).assert().success();
    assert_eq!(fixture.submission(), "image_id,identity\nq1,A\nq2,A\n");

    fixture
        .command()
        .args(args)
        .args(["--calibrate", "--calibration-size", "4"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Calibration fitted"));
    assert_eq!(
        fixture.submission(),
        "image_id,identity\nq1,new_individual\nq2,A\n"
    );
}

#[test]
fn test_fusion_without_local_scores_fails() {
    let fixture = Fixture::new(standard_embeddings());

    fixture
        .command()
        .args(["--alpha", "0.7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("local scores"));
}

#[test]
fn test_mixed_embedding_dimensions_fail() {
    let fixture = Fixture::new("d1,1,0,0,0\nd2,0,1,0\n");

    fixture
        .command()
        .args(["--alpha", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_non_finite_embedding_fails() {
    let fixture = Fixture::new(
        "\
d1,1,0,0,0
d2,0,1,0,0
d3,NaN,0,0,0
q1,0,1,0,0
t1,0,0,0.9,0.1
q2,1,0,0,0
",
    );

    fixture
        .command()
        .args(["--alpha", "1", "-t", "0.5", "-k", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-finite"));

    assert!(!fixture.path("submission.csv").exists());
}

#[test]
fn test_missing_metadata_file_fails() {
    let fixture = Fixture::new(standard_embeddings());
    std::fs::remove_file(fixture.path("metadata.csv")).unwrap();

    fixture
        .command()
        .args(["--alpha", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("metadata.csv"));
}

#[test]
fn test_out_of_range_alpha_rejected() {
    let fixture = Fixture::new(standard_embeddings());

    fixture
        .command()
        .args(["--alpha", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha"));
}

#[test]
fn test_cli_overrides_invalid_config_value() {
    let fixture = Fixture::new(standard_embeddings());
    fixture.write("config.toml", "[matching]\nalpha = 1.5\n");

    fixture
        .command()
        .args(["--alpha", "1", "-t", "0.5", "-k", "2", "--no-query-expansion"])
        .assert()
        .success();

    assert_eq!(
        fixture.submission(),
        "image_id,identity\nq1,B\nq2,new_individual\nt1,C\n"
    );
}

#[test]
fn test_invalid_config_value_without_override_fails() {
    let fixture = Fixture::new(standard_embeddings());
    fixture.write("config.toml", "[matching]\nalpha = 1.5\n");

    fixture
        .command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("alpha"));
}
