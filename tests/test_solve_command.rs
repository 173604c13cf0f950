use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::{predicate, PredicateBooleanExt};

const TRIVIAL_INSTANCE: &str = "trivial\n1\n1\n1 (1)\n1 (1)\n";

const TIED_INSTANCE: &str = "tied\n2\n2\n1 (1)\n2 (1)\n1 (1 2)\n2 (1)(2)\n";

const DIVERGENT_INSTANCE: &str = "divergent\n2\n2\n1 (1)(2)\n2 (1 2)\n1 (1 2)\n2 (1 2)\n";

const EMPTY_LIST_INSTANCE: &str = "empty list\n2\n1\n1\n2 (1)\n1 (2)\n";

fn solve(instance: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let file = NamedTempFile::new("instance.smti").unwrap();
    file.write_str(instance).unwrap();
    let mut cmd = Command::cargo_bin("matchop").unwrap();
    cmd.arg("solve")
        .arg("-f")
        .arg(file.path())
        .args(args)
        .arg("--logging-level")
        .arg("off");
    let assert = cmd.assert();
    file.close().unwrap();
    assert
}

#[test]
fn test_solve_trivial_instance() {
    solve(TRIVIAL_INSTANCE, &[])
        .success()
        .stdout(predicate::eq("m1 - w1\n"));
}

#[test]
fn test_solve_trivial_instance_with_pairwise_encoding() {
    solve(TRIVIAL_INSTANCE, &["--encoding", "pairwise"])
        .success()
        .stdout(predicate::eq("m1 - w1\n"));
}

#[test]
fn test_solve_all_enumerates_the_tied_matchings() {
    solve(TIED_INSTANCE, &["--all"])
        .success()
        .stdout(predicate::str::contains("m1 - w1").and(predicate::str::contains("m2 - w1")));
}

#[test]
fn test_solve_maxcard_on_tied_instance() {
    solve(TIED_INSTANCE, &["-o", "maxcard"])
        .success()
        .stdout(predicate::eq("m1 - w1\n").or(predicate::eq("m2 - w1\n")));
}

#[test]
fn test_solve_egalitarian_selects_the_cheapest_matching() {
    solve(DIVERGENT_INSTANCE, &["-o", "egalitarian"])
        .success()
        .stdout(predicate::eq("m1 - w1\nm2 - w2\n"));
}

#[test]
fn test_solve_maxcard_is_indifferent_on_divergent_instance() {
    solve(DIVERGENT_INSTANCE, &["-o", "maxcard"])
        .success()
        .stdout(predicate::eq("m1 - w1\nm2 - w2\n").or(predicate::eq("m1 - w2\nm2 - w1\n")));
}

#[test]
fn test_solve_sexequal() {
    // the other perfect matching has rank sums 3 and 2, hence cost 1
    solve(DIVERGENT_INSTANCE, &["-o", "sexequal"])
        .success()
        .stdout(predicate::eq("m1 - w1\nm2 - w2\n"));
}

#[test]
fn test_solve_man_with_empty_list_stays_single() {
    solve(EMPTY_LIST_INSTANCE, &["--show-singles"])
        .success()
        .stdout(predicate::eq("m1 - single\nm2 - w1\n"));
}

#[test]
fn test_solve_missing_instance_file() {
    let mut cmd = Command::cargo_bin("matchop").unwrap();
    cmd.arg("solve")
        .arg("-f")
        .arg("/does/not/exist")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().failure();
}

#[test]
fn test_solve_malformed_instance() {
    solve("bad\n1\n1\n1 (2)\n1 (1)\n", &[]).failure();
}

#[test]
fn test_solve_unknown_objective_is_rejected() {
    solve(TRIVIAL_INSTANCE, &["-o", "foo"]).failure();
}
