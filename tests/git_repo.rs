use std::path::Path;
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use dev_helper::history::{parse, resolve};
use dev_helper::{workspace, GitError, GitManager, Vcs, WorkflowError};

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("failed to spawn git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Repository with three commits on `main`, or None when git is not installed.
fn fixture() -> Option<TempDir> {
    if which::which("git").is_err() {
        eprintln!("git not found, skipping");
        return None;
    }

    let dir = TempDir::new().unwrap();
    let root = dir.path();
    git(root, &["init", "-q"]);
    git(root, &["checkout", "-q", "-b", "main"]);
    git(root, &["config", "user.name", "Test User"]);
    git(root, &["config", "user.email", "test@example.com"]);
    git(root, &["config", "commit.gpgsign", "false"]);

    for (file, subject) in [("a.txt", "add a"), ("b.txt", "add b"), ("c.txt", "add c")] {
        std::fs::write(root.join(file), subject).unwrap();
        git(root, &["add", file]);
        git(root, &["commit", "-q", "-m", subject]);
    }
    Some(dir)
}

#[test]
fn test_log_parses_newest_first() {
    let Some(dir) = fixture() else { return };
    let manager = assert_ok!(GitManager::new(dir.path()));

    let log = parse(&assert_ok!(manager.log(50)));
    let subjects: Vec<_> = log.records().iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["add c", "add b", "add a"]);
    assert!(log.records().iter().all(|c| c.author == "Test User"));
    assert!(log.records()[0].full_hash.starts_with(&log.records()[0].short_hash));

    assert_eq!(parse(&manager.log(2).unwrap()).len(), 2);
}

#[test]
fn test_range_between_real_commits() {
    let Some(dir) = fixture() else { return };
    let manager = GitManager::new(dir.path()).unwrap();
    let log = parse(&manager.log(50).unwrap());

    let oldest = log.records()[2].full_hash.clone();
    let newest = log.records()[0].full_hash.clone();
    let range = assert_ok!(resolve(&newest, &oldest, &log));
    assert_eq!(range.older_hash, oldest);
    assert_eq!(range.messages(), vec!["add c", "add b", "add a"]);

    let diff = assert_ok!(manager.diff(Some((oldest.as_str(), newest.as_str()))));
    assert!(diff.contains("b.txt"));
    assert!(diff.contains("c.txt"));
    assert!(!diff.contains("a.txt"));
}

#[test]
fn test_show_and_working_tree_diff() {
    let Some(dir) = fixture() else { return };
    let manager = GitManager::new(dir.path()).unwrap();
    let log = parse(&manager.log(1).unwrap());

    let shown = assert_ok!(manager.show(&log.records()[0].full_hash));
    assert!(shown.contains("add c"));

    assert_eq!(manager.diff(None).unwrap(), "");
    std::fs::write(dir.path().join("a.txt"), "changed").unwrap();
    assert!(manager.diff(None).unwrap().contains("+changed"));
}

#[test]
fn test_branch_helpers() {
    let Some(dir) = fixture() else { return };
    let manager = GitManager::new(dir.path()).unwrap();
    assert_eq!(manager.current_branch().unwrap(), "main");

    git(dir.path(), &["branch", "main_tmp"]);
    assert_ok!(manager.delete_branch("main_tmp"));
    assert!(matches!(
        assert_err!(manager.delete_branch("main_tmp")),
        GitError::Failed { .. }
    ));
}

#[test]
fn test_opening_a_plain_directory_fails() {
    if which::which("git").is_err() {
        return;
    }
    let dir = TempDir::new().unwrap();
    // A temp dir may itself sit inside a repository on some machines.
    if GitManager::new(dir.path()).is_ok() {
        return;
    }

    assert!(matches!(
        workspace::open(Some(dir.path()), "git"),
        Err(WorkflowError::MissingWorkspace(_))
    ));
}

#[test]
fn test_option_like_refs_are_not_parsed_as_options() {
    let Some(dir) = fixture() else { return };
    let manager = GitManager::new(dir.path()).unwrap();
    let target = dir.path().join("written-by-git.txt");
    let injected = format!("--output={}", target.display());

    assert_err!(manager.show(&injected));
    assert_err!(manager.diff(Some((injected.as_str(), "HEAD"))));
    assert!(!target.exists());
}
