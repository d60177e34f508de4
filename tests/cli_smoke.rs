use assert_cmd::prelude::*;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

/// Write `name` and commit it with both author and committer date set to `date`.
fn commit_file_at(dir: &Path, name: &str, content: &str, date: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();

    git(dir, &["add", name]);
    git_at(dir, &["commit", "-m", &format!("edit {name}")], date);
}

/// Run a committing git command with both author and committer date set to `date`.
fn git_at(dir: &Path, args: &[&str], date: &str) {
    assert!(Command::new("git")
        .args(args)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn commit_count(dir: &Path) -> u64 {
    let out = Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(dir)
        .output()
        .unwrap();
    String::from_utf8(out.stdout).unwrap().trim().parse().unwrap()
}

fn timeline_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("gmonth").unwrap();
    cmd.current_dir(dir).arg("--repo").arg(dir).args(extra).args(["timeline", "--json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn file_entry<'a>(v: &'a serde_json::Value, path: &str) -> &'a serde_json::Value {
    v["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["path"] == path)
        .unwrap_or_else(|| panic!("{path} missing from output"))
}

fn buckets(entry: &serde_json::Value) -> Vec<(String, u64)> {
    entry["buckets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| (b["label"].as_str().unwrap().to_string(), b["count"].as_u64().unwrap()))
        .collect()
}

#[test]
fn timeline_json_fills_gaps_between_months() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "a.txt", "one\n", "2020-11-05 12:00:00 +0000");
    commit_file_at(dir.path(), "a.txt", "two\n", "2021-02-10 12:00:00 +0000");

    let v = timeline_json(dir.path(), &["--no-cache"]);
    assert_eq!(v["version"], 1);
    assert_eq!(v["listing"], "tree");
    assert_eq!(
        buckets(file_entry(&v, "a.txt")),
        vec![
            ("November 2020".to_string(), 1),
            ("December 2020".to_string(), 0),
            ("January 2021".to_string(), 0),
            ("February 2021".to_string(), 1),
        ]
    );
}

#[test]
fn tree_listing_counts_unchanged_files_but_changed_listing_does_not() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "a.txt", "a\n", "2021-01-15 12:00:00 +0000");
    commit_file_at(dir.path(), "src/b.rs", "fn b(){}\n", "2021-01-20 12:00:00 +0000");

    let tree = timeline_json(dir.path(), &["--no-cache"]);
    assert_eq!(buckets(file_entry(&tree, "a.txt")), vec![("January 2021".to_string(), 2)]);

    let changed = timeline_json(dir.path(), &["--no-cache", "--listing", "changed"]);
    assert_eq!(changed["listing"], "changed");
    assert_eq!(buckets(file_entry(&changed, "a.txt")), vec![("January 2021".to_string(), 1)]);
    assert_eq!(buckets(file_entry(&changed, "src/b.rs")), vec![("January 2021".to_string(), 1)]);
}

#[test]
fn timeline_months_follow_author_timezone() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    // both fall in February 2021 when read as UTC
    commit_file_at(dir.path(), "a.txt", "one\n", "2021-01-31 23:30:00 -0500");
    commit_file_at(dir.path(), "a.txt", "two\n", "2021-03-01 00:30:00 +0100");

    let v = timeline_json(dir.path(), &["--no-cache"]);
    assert_eq!(
        buckets(file_entry(&v, "a.txt")),
        vec![
            ("January 2021".to_string(), 1),
            ("February 2021".to_string(), 0),
            ("March 2021".to_string(), 1),
        ]
    );
}

#[test]
fn merge_history_counts_each_commit_once() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "file.txt", "one\n", "2021-01-05 12:00:00 +0000");
    git(dir.path(), &["checkout", "-b", "feat"]);
    commit_file_at(dir.path(), "feat.txt", "feat\n", "2021-01-10 12:00:00 +0000");
    git(dir.path(), &["checkout", "-"]);
    commit_file_at(dir.path(), "file.txt", "two\n", "2021-01-15 12:00:00 +0000");
    git_at(
        dir.path(),
        &["merge", "--no-ff", "feat", "-m", "merge feat"],
        "2021-01-20 12:00:00 +0000",
    );
    assert_eq!(commit_count(dir.path()), 4);

    let v = timeline_json(dir.path(), &["--no-cache"]);
    let root: u64 = buckets(file_entry(&v, "file.txt")).iter().map(|(_, n)| n).sum();
    assert_eq!(root, commit_count(dir.path()));
    assert_eq!(buckets(file_entry(&v, "feat.txt")), vec![("January 2021".to_string(), 2)]);
}

#[test]
fn changed_listing_credits_both_sides_of_a_rename() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "old.txt", "same content\n", "2021-01-10 12:00:00 +0000");
    git(dir.path(), &["mv", "old.txt", "new.txt"]);
    git_at(dir.path(), &["commit", "-m", "rename"], "2021-03-10 12:00:00 +0000");

    let v = timeline_json(dir.path(), &["--no-cache", "--listing", "changed"]);
    assert_eq!(
        buckets(file_entry(&v, "old.txt")),
        vec![
            ("January 2021".to_string(), 1),
            ("February 2021".to_string(), 0),
            ("March 2021".to_string(), 1),
        ]
    );
    assert_eq!(buckets(file_entry(&v, "new.txt")), vec![("March 2021".to_string(), 1)]);
}

#[test]
fn cached_run_matches_fresh_run() {
    let dir = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "lib.rs", "pub fn hi(){}\n", "2022-03-01 09:00:00 +0000");
    commit_file_at(dir.path(), "lib.rs", "pub fn hi(){ }\n", "2022-05-01 09:00:00 +0000");

    let cache_arg = cache_dir.path().to_string_lossy().to_string();
    let first = timeline_json(dir.path(), &["--cache", &cache_arg]);
    assert!(cache_dir.path().join("cache.db").exists());
    let second = timeline_json(dir.path(), &["--cache", &cache_arg]);

    assert_eq!(first["files"], second["files"]);
    assert_eq!(buckets(file_entry(&second, "lib.rs")).len(), 3);
}

#[test]
fn ndjson_prints_one_file_per_line() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "a.txt", "a\n", "2021-06-01 12:00:00 +0000");
    commit_file_at(dir.path(), "b.txt", "b\n", "2021-06-02 12:00:00 +0000");

    let mut cmd = Command::cargo_bin("gmonth").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--no-cache", "timeline", "--ndjson"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();

    let paths: Vec<String> = text
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["a.txt".to_string(), "b.txt".to_string()]);
}

#[test]
fn chart_writes_html_page() {
    let dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "a.txt", "a\n", "2021-06-01 12:00:00 +0000");

    let output = out_dir.path().join("charts.html");
    let mut cmd = Command::cargo_bin("gmonth").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--no-cache", "chart", "--output"])
        .arg(&output);
    cmd.assert().success();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("File: a.txt"));
    assert_eq!(html.matches("<svg").count(), 1);
}

#[test]
fn repository_without_commits_fails() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());

    let mut cmd = Command::cargo_bin("gmonth").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--no-cache", "timeline", "--json"]);
    let out = cmd.assert().failure().get_output().stderr.clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("Failed to collect file history"));
}
