// Regression tests for the tspi binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn tspi() -> Command {
    let mut cmd = Command::cargo_bin("tspi").unwrap();
    cmd.env_remove("TSPI_LOG").arg("--color").arg("never");
    cmd
}

#[test]
fn cli_run_prints_each_output() {
    tspi()
        .arg("run")
        .arg(common::demo("hex_pairs.tspi"))
        .args(["-i", "0aZZ1f"])
        .assert()
        .success()
        .stdout(contains("caught :: \"0a\"").and(contains("caught :: \"1f\"")))
        .stdout(contains("finished at offset 6"));
}

#[test]
fn cli_run_reads_input_file() {
    let input = common::scratch_file("digits-input.txt", "12");
    tspi()
        .arg("run")
        .arg(common::demo("digits.tspi"))
        .arg("--input-file")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("caught :: \"1\"").and(contains("caught :: \"2\"")));
    let _ = fs::remove_file(input);
}

#[test]
fn cli_run_reports_unrecovered_failure() {
    let program = common::scratch_file("strict.tspi", "assert (a)\nconsume\nfinish\n");
    tspi()
        .arg("run")
        .arg(&program)
        .args(["-i", "ab"])
        .assert()
        .failure()
        .stdout(contains("caught :: \"a\""))
        .stderr(
            contains("Program terminated")
                .and(contains("tspi::control::control_failure"))
                .and(contains("Unrecovered control failure: assertion rejected 'b' on line 1"))
                .and(contains("failed here")),
        );
    let _ = fs::remove_file(program);
}

#[test]
fn cli_run_json_includes_failure_reason() {
    let program = common::scratch_file("strict-json.tspi", "assert (a)\nconsume\nfinish\n");
    tspi()
        .arg("run")
        .arg(&program)
        .args(["-i", "ab", "--json"])
        .assert()
        .failure()
        .stdout(contains("\"outputs\"").and(contains("\"assert_mismatch\"")));
    let _ = fs::remove_file(program);
}

#[test]
fn cli_once_stops_after_one_run() {
    tspi()
        .arg("once")
        .arg(common::demo("hex_pairs.tspi"))
        .args(["-i", "0a1f"])
        .assert()
        .success()
        .stdout(contains("caught :: \"0a\"").and(contains("stopped at offset 2")));
}

#[test]
fn cli_reports_miette_diagnostics_on_syntax_error() {
    let bad_file = common::scratch_file("bad.tspi", "consume\njump\n");
    tspi()
        .arg("run")
        .arg(&bad_file)
        .args(["-i", "x"])
        .assert()
        .failure()
        .stderr(
            contains("tspi::syntax::unrecognised_instruction")
                .and(contains("Unrecognised instruction \"jump\" on line 2"))
                .and(contains("unknown instruction")),
        );
    let _ = fs::remove_file(bad_file);
}

#[test]
fn cli_disasm_lists_numbered_lines() {
    tspi()
        .arg("disasm")
        .arg(common::demo("digits.tspi"))
        .assert()
        .success()
        .stdout(contains("| select").and(contains("|     case (0123456789)")));
}

#[test]
fn cli_ast_emits_json() {
    tspi()
        .arg("ast")
        .arg(common::demo("digits.tspi"))
        .assert()
        .success()
        .stdout(contains("\"op\": \"select\"").and(contains("\"cases\"")));
}

#[test]
fn cli_check_demos_pass() {
    tspi()
        .arg("check")
        .arg(common::demo(""))
        .assert()
        .success()
        .stdout(contains("3 file(s) parsed"));
}

#[test]
fn cli_check_flags_broken_program() {
    let bad_file = common::scratch_file("broken-check.tspi", "select\n    omit\n");
    tspi()
        .arg("check")
        .arg(&bad_file)
        .assert()
        .failure()
        .stdout(contains("1 file(s) with errors"));
    let _ = fs::remove_file(bad_file);
}

#[test]
fn cli_requires_exactly_one_input_source() {
    tspi()
        .arg("run")
        .arg(common::demo("digits.tspi"))
        .assert()
        .failure();
}
