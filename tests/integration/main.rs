//! Integration tests for Monoscope
//!
//! These drive the built binary against a real git repository holding a
//! small Go monorepo.

use git2::{IndexAddOption, Oid, Repository, Signature};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, content: &str) {
    fs::create_dir_all(path.as_ref().parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn go_mod(name: &str, requires: &[&str]) -> String {
    let mut content = format!("module example.com/mono/{name}\n\ngo 1.22\n");
    for r in requires {
        content.push_str(&format!("\nrequire example.com/mono/{r} v0.0.0\n"));
    }
    content
}

fn commit_all(repo: &Repository, message: &str) -> Oid {
    let sig = Signature::now("Tester", "tester@example.com").unwrap();
    let mut index = repo.index().unwrap();
    index.add_all(["*"], IndexAddOption::DEFAULT, None).unwrap();
    index.update_all(["*"], None).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents).unwrap()
}

/// `core <- api <- web`, plus an unrelated `tools` module.
fn monorepo() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    write_file(dir.path().join("core/go.mod"), &go_mod("core", &[]));
    write_file(dir.path().join("core/core.go"), "package core\n");
    write_file(dir.path().join("api/go.mod"), &go_mod("api", &["core"]));
    write_file(dir.path().join("api/api.go"), "package api\n");
    write_file(dir.path().join("web/go.mod"), &go_mod("web", &["api"]));
    write_file(dir.path().join("web/web.go"), "package web\n");
    write_file(dir.path().join("tools/go.mod"), &go_mod("tools", &[]));
    write_file(dir.path().join("tools/README.md"), "tools\n");
    commit_all(&repo, "initial");
    (dir, repo)
}

fn monoscope(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_monoscope"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to execute monoscope")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "monoscope failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_monoscope"))
        .arg("--help")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("impacted"));
    assert!(stdout.contains("dependents"));
}

#[test]
fn test_impacted_after_core_change() {
    let (dir, repo) = monorepo();
    write_file(dir.path().join("core/core.go"), "package core\n\nconst V = 2\n");
    commit_all(&repo, "touch core");

    let output = monoscope(dir.path(), &["impacted", "--base", "HEAD~1", "--head", "HEAD"]);
    let value = stdout_json(&output);
    insta::assert_json_snapshot!(value, @r###"
    [
      {
        "name": "example.com/mono/core",
        "path": "core"
      },
      {
        "name": "example.com/mono/api",
        "path": "api"
      },
      {
        "name": "example.com/mono/web",
        "path": "web"
      }
    ]
    "###);
}

#[test]
fn test_impacted_ignores_non_matching_files() {
    let (dir, repo) = monorepo();
    write_file(dir.path().join("tools/README.md"), "tools, documented\n");
    commit_all(&repo, "docs");

    let output = monoscope(
        dir.path(),
        &["impacted", "--base", "HEAD~1", "--path-only"],
    );
    assert_eq!(stdout_json(&output), serde_json::json!([]));
}

#[test]
fn test_changed_from_beginning_of_history() {
    let (dir, _repo) = monorepo();

    let output = monoscope(
        dir.path(),
        &["changed", "--base", "0000000000000000000000000000000000000000", "--format", "text"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines, vec!["api", "core", "tools", "web"]);
}

#[test]
fn test_dependents_of_single_module() {
    let (dir, _repo) = monorepo();

    let output = monoscope(dir.path(), &["dependents", "--module", "api", "--path-only"]);
    assert_eq!(stdout_json(&output), serde_json::json!(["web"]));

    let output = monoscope(
        dir.path(),
        &["dependents", "--module", "core", "--include-self", "--path-only"],
    );
    assert_eq!(stdout_json(&output), serde_json::json!(["core", "api", "web"]));
}

#[test]
fn test_settings_file_applies() {
    let (dir, repo) = monorepo();
    fs::write(dir.path().join(".monoscope.toml"), "pattern = '\\.md$'\nformat = \"text\"\n").unwrap();
    write_file(dir.path().join("tools/README.md"), "tools, documented\n");
    commit_all(&repo, "docs");

    let output = monoscope(dir.path(), &["impacted", "--base", "HEAD~1"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "tools");
}

#[test]
fn test_unknown_revision_fails() {
    let (dir, _repo) = monorepo();

    let output = monoscope(dir.path(), &["impacted", "--base", "does-not-exist"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
