use assert_cmd::prelude::*;
use chrono::{Duration, Utc};
use gitdigest::git::GitRepo;
use gitdigest::model::AnalysisWindow;
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
    git(dir, &["config", "user.email", "noor@example.com"]);
    git(dir, &["config", "user.name", "Noor"]);
}

fn commit_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", &format!("add {name}")]);
}

/// A command with no ambient credentials or config file.
fn gitdigest(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gitdigest").unwrap();
    cmd.env("HOME", home)
        .env("GITINSPECTOR_PATH", "gitdigest-no-such-inspector")
        .env_remove("OPENAI_API_KEY")
        .env_remove("SLACK_TOKEN")
        .env_remove("SLACK_WEBHOOK_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn collects_commits_with_line_counts() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/lib.rs", "pub fn a() {}\npub fn b() {}\n");
    commit_file(dir.path(), "src/lib.rs", "pub fn a() {}\npub fn c() {}\npub fn d() {}\n");

    let repo = GitRepo::open(dir.path()).unwrap();
    let now = Utc::now() + Duration::minutes(1);
    let commits = repo
        .collect_commits(&AnalysisWindow::last_days(now, 7).unwrap())
        .unwrap();

    assert_eq!(commits.len(), 2);
    let newest = &commits[0];
    assert_eq!(newest.author_name, "Noor");
    assert_eq!(newest.files_changed, vec!["src/lib.rs".to_string()]);
    assert_eq!(newest.insertions, 2);
    assert_eq!(newest.deletions, 1);
    assert_eq!(commits[1].insertions, 2);
    assert_eq!(commits[1].deletions, 0);
}

#[test]
fn window_in_the_past_excludes_new_commits() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let repo = GitRepo::open(dir.path()).unwrap();
    let end = Utc::now() - Duration::days(30);
    let commits = repo
        .collect_commits(&AnalysisWindow::last_days(end, 7).unwrap())
        .unwrap();
    assert!(commits.is_empty());
}

#[test]
fn offline_dry_run_saves_templated_report() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "app.py", "print('hi')\n");
    commit_file(dir.path(), "README.md", "# hi\n");

    let report = home.path().join("report.md");
    gitdigest(home.path())
        .args(["analyze", "--dry-run", "--offline", "--days", "3", "-r"])
        .arg(dir.path())
        .arg("--save-report")
        .arg(&report)
        .assert()
        .success();

    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("# Git Repository Analysis Report"));
    assert!(text.contains("- **Total Commits**: 2"));
    assert!(text.contains("1. **Noor**"));
}

#[test]
fn analyze_without_slack_credentials_fails() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    gitdigest(home.path())
        .args(["analyze", "--offline", "-r"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn analyze_without_api_key_fails_unless_offline() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    gitdigest(home.path())
        .args(["analyze", "--dry-run", "-r"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn analyze_rejects_out_of_range_days() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let out = gitdigest(home.path())
        .args(["analyze", "--dry-run", "--offline", "--days", "4000000000", "-r"])
        .arg(dir.path())
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&out);
    assert!(stderr.contains("Invalid date"));
    assert!(!stderr.contains("panicked"));
}

#[test]
fn analyze_rejects_non_repository() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();

    gitdigest(home.path())
        .args(["analyze", "--dry-run", "--offline", "-r"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn validate_repos_reports_each_path() {
    let dir = tempdir().unwrap();
    let home = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.txt", "a\n");

    let out = gitdigest(home.path())
        .arg("validate-repos")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&out);
    assert!(stdout.contains("Valid Git repo (~1 commits)"));

    gitdigest(home.path())
        .arg("validate-repos")
        .arg(dir.path())
        .arg(home.path().join("missing"))
        .assert()
        .failure();
}
