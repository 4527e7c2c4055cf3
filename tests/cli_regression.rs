// Regression tests driving the minisciath binary end to end.
// Requires: assert_cmd, predicates crates in [dev-dependencies]
#![cfg(unix)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const SUITE: &str = "\
# smoke suite
- name: hello
  command: echo hello
  expected: expected/hello.txt
  group: fast

- name: quoted
  command: echo 'two  spaces'
  expected: expected/quoted.txt
";

/// Fresh directory holding `tests.yml` and whatever expected files are given.
fn fixture(name: &str, suite: &str, expected: &[(&str, &str)]) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("expected")).unwrap();
    fs::write(dir.join("tests.yml"), suite).unwrap();
    for (file, text) in expected {
        fs::write(dir.join(file), text).unwrap();
    }
    dir
}

fn minisciath(dir: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("minisciath").unwrap();
    cmd.current_dir(dir).arg("tests.yml").arg("--color").arg("never");
    cmd
}

#[test]
fn passing_suite_exits_zero() {
    let dir = fixture(
        "cli_pass",
        SUITE,
        &[
            ("expected/hello.txt", "hello\n"),
            ("expected/quoted.txt", "two  spaces\n"),
        ],
    );
    minisciath(&dir)
        .assert()
        .success()
        .stdout(contains("Running hello").and(contains("SUCCESS  (2 of 2 total tests)")));
    assert!(dir.join("hello.output").is_file());
}

#[test]
fn differing_output_fails_with_diff_and_hint() {
    let dir = fixture(
        "cli_fail",
        SUITE,
        &[
            ("expected/hello.txt", "goodbye\n"),
            ("expected/quoted.txt", "two  spaces\n"),
        ],
    );
    minisciath(&dir).assert().code(1).stdout(
        contains("Output differs from expected:")
            .and(contains("-goodbye"))
            .and(contains("+hello"))
            .and(contains("To re-run with only failed tests"))
            .and(contains("tests.yml -t hello")),
    );
}

#[test]
fn missing_expectations_can_be_generated() {
    let dir = fixture("cli_update", SUITE, &[]);
    minisciath(&dir).assert().code(1).stdout(
        contains("Expected file expected/hello.txt missing")
            .and(contains("tests.yml -t hello,quoted --update")),
    );

    minisciath(&dir)
        .arg("--update")
        .assert()
        .success()
        .stdout(contains("Expected output updated."));
    assert_eq!(
        fs::read_to_string(dir.join("expected/hello.txt")).unwrap(),
        "hello\n"
    );

    minisciath(&dir).assert().success();
}

#[test]
fn group_filters_narrow_the_run() {
    let dir = fixture("cli_groups", SUITE, &[("expected/hello.txt", "hello\n")]);
    minisciath(&dir)
        .args(["--only-group", "fast"])
        .assert()
        .success()
        .stdout(contains("(only group fast) (1 of 2 total tests)").and(contains("quoted").not()));
}

#[test]
fn unknown_test_in_subset_is_an_error() {
    let dir = fixture("cli_subset", SUITE, &[]);
    minisciath(&dir)
        .args(["-t", "nope"])
        .assert()
        .code(2)
        .stderr(contains("unrecognized test 'nope'"));
}

#[test]
fn parse_errors_render_miette_diagnostics() {
    let dir = fixture("cli_parse", "- name: a\n  name: b\n", &[]);
    minisciath(&dir)
        .assert()
        .code(2)
        .stderr(contains("minisciath::parse::duplicate_key").and(contains("tests.yml")));
}

#[test]
fn dump_prints_the_parsed_document() {
    let dir = fixture("cli_dump", SUITE, &[]);
    minisciath(&dir)
        .arg("--dump")
        .assert()
        .success()
        .stdout(contains("-\n  name: hello\n  command: echo hello\n"));
}
