use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::{TempDir, tempdir};

fn resolve_cmd() -> Command {
    let mut cmd = Command::cargo_bin("chic-resolve").expect("chic-resolve binary");
    cmd.env_remove("CHIC_ERROR_FORMAT")
        .env_remove("CHIC_TRACE_PIPELINE")
        .env_remove("CHIC_LOG_LEVEL")
        .env_remove("CHIC_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_source(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).expect("write source");
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

const CLEAN: &str = r#"
class Customer(public string name) {
    public int Age => 40;
}
class Shop {
    Customer customer;
    int? Age() => customer?.Age;
}
"#;

const BROKEN: &str = r#"
class Person(private readonly string first, string last) {
    public string Full => this.first + " " + last;
}
"#;

#[test]
fn help_and_version() {
    resolve_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("USAGE:").and(contains("check")));

    resolve_cmd()
        .args(["help", "check"])
        .assert()
        .success()
        .stdout(contains("--emit-lowered"));

    resolve_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("chic-resolve "));
}

#[test]
fn usage_errors_fail() {
    resolve_cmd()
        .assert()
        .failure()
        .stderr(contains("missing command"));

    resolve_cmd()
        .args(["check", "a.cl", "--bogus"])
        .assert()
        .failure()
        .stderr(contains("unsupported option '--bogus'"));
}

#[test]
fn clean_source_passes() {
    let dir = tempdir().expect("tempdir");
    let source = write_source(&dir, "shop.cl", CLEAN);
    resolve_cmd()
        .args(["check", path_arg(&source)])
        .assert()
        .success()
        .stdout(contains("check passed for").and(contains("1 null-conditional chain(s)")));
}

#[test]
fn emit_lowered_prints_single_evaluation_form() {
    let dir = tempdir().expect("tempdir");
    let source = write_source(&dir, "shop.cl", CLEAN);
    resolve_cmd()
        .args(["check", path_arg(&source), "--emit-lowered", "--sequential"])
        .assert()
        .success()
        .stdout(
            contains("customer?.Age : lifted int?")
                .and(contains("let $t0 = customer in ($t0 == null ? null : (int?)($t0.Age))")),
        );
}

#[test]
fn diagnostics_fail_the_run() {
    let dir = tempdir().expect("tempdir");
    let source = write_source(&dir, "person.cl", BROKEN);
    resolve_cmd()
        .args(["check", path_arg(&source), "--error-format", "short"])
        .assert()
        .failure()
        .stdout(contains("CAP001").and(contains("`last`")))
        .stderr(contains("1 error(s) reported for"));
}

#[test]
fn json_output_is_machine_readable() {
    let dir = tempdir().expect("tempdir");
    let source = write_source(&dir, "person.cl", BROKEN);
    let output = resolve_cmd()
        .args(["check", path_arg(&source), "--error-format", "json"])
        .output()
        .expect("run chic-resolve");
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.contains("\"CAP001\""), "{stdout}");
    assert!(!stdout.contains("check passed"), "{stdout}");
}

#[test]
fn syntax_errors_and_missing_files_fail() {
    let dir = tempdir().expect("tempdir");
    let source = write_source(&dir, "broken.cl", "class {");
    resolve_cmd()
        .args(["check", path_arg(&source)])
        .assert()
        .failure()
        .stderr(contains("error: "));

    resolve_cmd()
        .args(["check", path_arg(&dir.path().join("absent.cl"))])
        .assert()
        .failure()
        .stderr(contains("I/O error"));
}

#[test]
fn trace_pipeline_logs_stages_to_stderr() {
    let dir = tempdir().expect("tempdir");
    let source = write_source(&dir, "shop.cl", CLEAN);
    resolve_cmd()
        .args(["check", path_arg(&source), "--trace-pipeline", "--log-format", "json"])
        .assert()
        .success()
        .stderr(contains("resolve.capture").and(contains("typeck.bodies")));
}
