use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap().parent().unwrap().to_path_buf()
}

fn koala() -> Command {
    Command::cargo_bin("koala").unwrap()
}

fn write_script(dir: &tempfile::TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, src).unwrap();
    path
}

#[test]
fn runs_hello_demo() {
    let mut cmd = koala();
    cmd.arg(workspace_root().join("demos/hello.koala"));
    cmd.assert().success().stdout("Hello, KoalaCode!\n");
}

#[test]
fn runs_factorial_demo() {
    let mut cmd = koala();
    cmd.arg(workspace_root().join("demos/factorial.koala"));
    cmd.assert().success().stdout("120\n3628800\n");
}

#[test]
fn runs_conditionals_demo() {
    let mut cmd = koala();
    cmd.arg(workspace_root().join("demos/conditionals.koala"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3 is less than 5"))
        .stdout(predicate::str::contains("both hold"))
        .stdout(predicate::str::contains("otherwise branch"))
        .stdout(predicate::str::contains("unreachable").not());
}

#[test]
fn runs_loops_demo() {
    let mut cmd = koala();
    cmd.arg(workspace_root().join("demos/loops.koala"));
    cmd.assert().success().stdout("0\n1\n2\n55\n-4\n");
}

#[test]
fn runs_arrays_demo() {
    let mut cmd = koala();
    cmd.arg(workspace_root().join("demos/arrays.koala"));
    cmd.assert().success().stdout("[11, 21, 31]\n3\n[11, 21, 31, 99]\n5\n");
}

#[test]
fn greet_demo_reads_stdin() {
    let mut cmd = koala();
    cmd.arg(workspace_root().join("demos/greet.koala")).write_stdin("Ada\neucalyptus\n");
    cmd.assert().success().stdout("Hi Ada, enjoy the eucalyptus!\n");
}

#[test]
fn dump_prints_bytecode_without_running() {
    let mut cmd = koala();
    cmd.arg(workspace_root().join("demos/factorial.koala")).arg("--dump");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<main>():"))
        .stdout(predicate::str::contains("fact(n):"))
        .stdout(predicate::str::contains("CALL_FUNC fact/1"))
        .stdout(predicate::str::contains("3628800").not());
}

#[test]
fn parse_error_is_nonzero() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let bad_path = write_script(&tmp_dir, "bad.koala", "func x(\n");

    let mut cmd = koala();
    cmd.arg(bad_path);
    cmd.assert().failure().stderr(predicate::str::contains("Parse error"));
}

#[test]
fn lex_error_is_reported() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_script(&tmp_dir, "lex.koala", "give(\"never closed);\n");

    let mut cmd = koala();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Lex error"))
        .stderr(predicate::str::contains("Unterminated string"));
}

#[test]
fn return_outside_function_is_compile_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_script(&tmp_dir, "ret.koala", "return 1;\n");

    let mut cmd = koala();
    cmd.arg(path);
    cmd.assert().failure().stderr(predicate::str::contains("Compile error"));
}

#[test]
fn runtime_error_keeps_earlier_output() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_script(&tmp_dir, "div.koala", "give(\"before\");\ngive(1 / 0);\ngive(\"after\");\n");

    let mut cmd = koala();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .stdout("before\n")
        .stderr(predicate::str::contains("Runtime error"))
        .stderr(predicate::str::contains("division by zero"));
}

#[test]
fn arity_mismatch_is_runtime_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_script(&tmp_dir, "arity.koala", "func add(a, b) return a + b;\ngive(add(1));\n");

    let mut cmd = koala();
    cmd.arg(path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("expects 2 argument(s), got 1"));
}

#[test]
fn missing_file_fails() {
    let mut cmd = koala();
    cmd.arg("definitely/not/here.koala");
    cmd.assert().failure().stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn repl_keeps_state_between_inputs() {
    let mut cmd = koala();
    cmd.write_stdin("func sq(x) {\n  return x * x;\n}\nn = 7;\ngive(sq(n));\n:vars\n:funcs\n:quit\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("49"))
        // names and values are colored separately
        .stdout(predicate::str::is_match(r"n\S* = \S*7").unwrap())
        .stdout(predicate::str::contains("sq"))
        .stdout(predicate::str::contains("Goodbye."));
}

#[test]
fn repl_take_reads_following_line() {
    let mut cmd = koala();
    cmd.write_stdin("give(\"got \" + take());\nkoala\n:quit\n");
    cmd.assert().success().stdout(predicate::str::contains("got koala"));
}

#[test]
fn repl_recovers_after_error() {
    let mut cmd = koala();
    cmd.write_stdin("give(nope);\ngive(\"still here\");\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("still here"))
        .stderr(predicate::str::contains("Undefined variable 'nope'"));
}
