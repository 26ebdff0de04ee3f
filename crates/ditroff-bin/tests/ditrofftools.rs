use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const DOCUMENT: &str = "x T utf8\nx res 240 24 40\np1\nV1000\n\
    x X ps:exec [/Dest /intro /DEST pdfmark\n\
    x X ps:exec [/Dest /intro /Title (Intro) /Level 1 /OUT pdfmark\n\
    p2\nV500\nv20\nx X pdf: pdfmark /Dest /details /DEST\n\
    x X ps:exec [/Dest /details /Title (Details) /Level 2 /OUT pdfmark\n";

fn write(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("input.ditroff");
    std::fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str], content: &str) -> assert_cmd::assert::Assert {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, content);
    let mut cmd = Command::cargo_bin("ditrofftools").unwrap();
    cmd.args(args).arg(&path);
    cmd.assert()
}

fn stdout(args: &[&str], content: &str) -> String {
    let output = run(args, content).success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn tokens() {
    similar_asserts::assert_eq!(
        stdout(&["tokens"], "p1\nV40 H0\ntHello\nDl 100 0\nx res 240 24 40\n"),
        "p1\nV40\nH0\ntHello\nDl 100 0\nx res 240 24 40\n"
    );
}

#[test]
fn tokens_as_json() {
    let output = stdout(&["tokens", "--json"], "p1\n");
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0]["kind"], "BeginPage");
    assert_eq!(value[0]["operand"], "1");
}

#[test]
fn trace() {
    let output = stdout(&["trace"], "p1\nV40\nH0\ntHello\nn40 0\n");
    assert!(output.contains("begin_page 1\n"), "{output}");
    assert!(output.contains(r#"text_run [Text("Hello")]"#), "{output}");
    assert!(output.contains("end_of_line 40 0\n"), "{output}");
}

#[test]
fn tty_text() {
    similar_asserts::assert_eq!(
        stdout(&["tty", "--format", "text"], "p1\nV0\nH0\ntHello\n"),
        "Hello\n"
    );
}

#[test]
fn tty_html() {
    similar_asserts::assert_eq!(
        stdout(&["tty"], "x font 3 B\np1\nV0\nH0\nf3\ntB\n"),
        "<b>B</b>\n"
    );
}

#[test]
fn tty_colours_can_be_disabled() {
    let source = "p1\nV0\nH0\nmr 65535 0 0\ntR\n";
    assert!(stdout(&["tty"], source).contains("data-sgr"));
    similar_asserts::assert_eq!(stdout(&["tty", "--no-sgr"], source), "R\n");
}

#[test]
fn tty_resolution_too_high() {
    run(&["tty"], "x T ps\nx res 72000 1 1\np1\n")
        .failure()
        .stderr(predicate::str::contains("higher than the maximum of 1000"));
}

#[test]
fn outline() {
    similar_asserts::assert_eq!(stdout(&["outline"], DOCUMENT), "Intro\n  Details\n");
}

#[test]
fn anchors() {
    similar_asserts::assert_eq!(
        stdout(&["anchors"], DOCUMENT),
        "details 2 520\nintro 1 1000\n"
    );
}

#[test]
fn anchors_as_json() {
    let output = stdout(&["anchors", "--json"], DOCUMENT);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["intro"]["page"], 1);
    assert_eq!(value["details"]["v"], 520);
}

#[test]
fn draw() {
    let output = stdout(&["draw"], "p1\nV1000\nH1000\nDl 100 0\n");
    assert!(output.starts_with("begin_page 612000 792000\n"), "{output}");
    assert!(output.contains("move_to 1000 1000\nline_to 1100 1000\n"), "{output}");
    assert!(output.ends_with("end_page\n"), "{output}");
}

#[test]
fn draw_missing_page() {
    run(&["draw", "--page", "3"], "p1\n")
        .failure()
        .stderr(predicate::str::contains(
            "page 3 does not exist; the document has 1 pages",
        ));
}

#[test]
fn warnings_are_reported() {
    run(&["trace"], "p1\nCxyzzy\n")
        .success()
        .stderr(predicate::str::contains("unknown glyph name `xyzzy`"));
}

#[test]
fn warnings_can_be_silenced() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "p1\nCxyzzy\n");
    let mut cmd = Command::cargo_bin("ditrofftools").unwrap();
    cmd.arg("--quiet").arg("trace").arg(&path);
    cmd.assert().success().stderr(predicate::str::is_empty());
}

#[test]
fn check() {
    run(&["check"], DOCUMENT).success();
    run(&["check"], "p1\nCxyzzy\nDz 1\n")
        .failure()
        .stderr(predicate::str::contains("check failure: 2 warnings"));
}

#[test]
fn missing_file() {
    let mut cmd = Command::cargo_bin("ditrofftools").unwrap();
    cmd.args(["tokens", "does_not_exist.ditroff"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read `does_not_exist.ditroff`"));
}

#[test]
fn standard_input() {
    assert_cmd::Command::cargo_bin("ditrofftools")
        .unwrap()
        .args(["tokens", "-"])
        .write_stdin("p1\ns10\n")
        .assert()
        .success()
        .stdout("p1\ns10\n");
}
