use std::path::{Path, PathBuf};

use crate::error::WorkflowError;
use crate::git::{GitError, GitManager};

/// Opens the repository that every command works in.
///
/// Fails before running any git command when the directory is missing or
/// is not inside a work tree.
pub fn open(dir: Option<&Path>, binary: &str) -> Result<GitManager, WorkflowError> {
    let dir: PathBuf = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|_| WorkflowError::MissingWorkspace(PathBuf::new()))?,
    };
    if !dir.is_dir() {
        return Err(WorkflowError::MissingWorkspace(dir));
    }

    which::which(binary).map_err(|e| GitError::Exec {
        binary: binary.to_string(),
        message: e.to_string(),
    })?;

    GitManager::with_binary(&dir, binary).map_err(|e| match e {
        GitError::NotARepo(path) => WorkflowError::MissingWorkspace(path),
        other => WorkflowError::Vcs(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            open(Some(&missing), "git"),
            Err(WorkflowError::MissingWorkspace(p)) if p == missing
        ));
    }

    #[test]
    fn test_unknown_git_binary() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            open(Some(dir.path()), "definitely-not-a-git-binary"),
            Err(WorkflowError::Vcs(GitError::Exec { .. }))
        ));
    }
}
