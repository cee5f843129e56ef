use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const REPLY: &str = "# Summary\n\nThe **build** passed.\n\n```sh\nmake test\n```\n";

fn write_reply(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("reply.md");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("chatmd")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_render_from_stdin() {
    cargo_bin_cmd!("chatmd")
        .arg("render")
        .write_stdin("**hi** <there>")
        .assert()
        .success()
        .stdout("<p><strong>hi</strong> &lt;there&gt;</p>\n");
}

#[test]
fn test_render_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_reply(&dir, REPLY);

    cargo_bin_cmd!("chatmd")
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<h1>Summary</h1>"))
        .stdout(predicate::str::contains(
            "<pre><code class=\"language-sh\">make test</code></pre>",
        ));
}

#[test]
fn test_render_standalone_uses_title() {
    cargo_bin_cmd!("chatmd")
        .args(["render", "--standalone", "--title", "Q&A"])
        .write_stdin("done")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<title>Q&amp;A</title>"))
        .stdout(predicate::str::contains("<p>done</p>"))
        .stdout(predicate::str::contains("Generated on: "));
}

#[test]
fn test_render_standalone_title_from_env() {
    cargo_bin_cmd!("chatmd")
        .args(["render", "--standalone"])
        .env("CHATMD_TITLE", "Deploy notes")
        .write_stdin("done")
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Deploy notes</h1>"));
}

#[test]
fn test_render_standalone_default_title() {
    cargo_bin_cmd!("chatmd")
        .args(["render", "--standalone"])
        .env_remove("CHATMD_TITLE")
        .write_stdin("done")
        .assert()
        .success()
        .stdout(predicate::str::contains("<title>Assistant Response</title>"));
}

#[test]
fn test_render_to_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("reply.html");

    cargo_bin_cmd!("chatmd")
        .arg("render")
        .arg("-o")
        .arg(&out)
        .write_stdin("*soft*")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&out).unwrap(), "<p><em>soft</em></p>\n");
}

#[test]
fn test_render_logs_diagnostics_without_failing() {
    cargo_bin_cmd!("chatmd")
        .arg("render")
        .env("CHATMD_LOG", "warn")
        .write_stdin("```rust\nfn main() {}")
        .assert()
        .success()
        .stdout("<p>```rust<br>fn main() {}</p>\n")
        .stderr(predicate::str::contains("unclosed code fence"));
}

#[test]
fn test_missing_file_reports_context() {
    cargo_bin_cmd!("chatmd")
        .args(["render", "does-not-exist.md"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to read 'does-not-exist.md'"));
}

#[test]
fn test_validate_clean_reply() {
    let dir = TempDir::new().unwrap();
    let path = write_reply(&dir, REPLY);

    cargo_bin_cmd!("chatmd")
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid: no diagnostics"));
}

#[test]
fn test_validate_degraded_reply_fails() {
    cargo_bin_cmd!("chatmd")
        .arg("validate")
        .write_stdin("#### Too deep\n\n```c++\nint x;\n```")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Degraded: 2 diagnostic(s)"))
        .stdout(predicate::str::contains("[invalid-language-tag]"))
        .stderr(predicate::str::contains("2 diagnostic(s) found"));
}

#[test]
fn test_validate_json() {
    cargo_bin_cmd!("chatmd")
        .args(["validate", "--json"])
        .write_stdin("```\nnever closed")
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\":false"))
        .stdout(predicate::str::contains("\"kind\":\"unclosed-delimiter\""));
}

#[test]
fn test_parse_summary() {
    cargo_bin_cmd!("chatmd")
        .arg("parse")
        .write_stdin(REPLY)
        .assert()
        .success()
        .stdout(predicate::str::contains("Blocks: 3"))
        .stdout(predicate::str::contains("[1] Heading (level 1)"))
        .stdout(predicate::str::contains("[3] CodeBlock (lang: sh)"));
}

#[test]
fn test_parse_verbose_shows_content() {
    cargo_bin_cmd!("chatmd")
        .args(["parse", "--verbose"])
        .write_stdin("The __build__ passed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Content: The **build** passed"));
}

#[test]
fn test_parse_json() {
    cargo_bin_cmd!("chatmd")
        .args(["parse", "--json"])
        .write_stdin(REPLY)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"Heading\""))
        .stdout(predicate::str::contains("\"type\": \"Strong\""))
        .stdout(predicate::str::contains("\"lang\": \"sh\""));
}

#[test]
fn test_stats() {
    cargo_bin_cmd!("chatmd")
        .arg("stats")
        .write_stdin(REPLY)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total:        3"))
        .stdout(predicate::str::contains("Strong:       1"))
        .stdout(predicate::str::contains("Diagnostics:    0"));
}
