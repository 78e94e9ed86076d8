use std::path::{Path, PathBuf};
use std::process::Command;

use crate::history::log_parser::LOG_FORMAT;

/// Makes git read every following argument as a revision, never as an option.
const END_OF_OPTIONS: &str = "--end-of-options";

/// Read access to version control plus the one write the session needs
/// (dropping a leftover scratch branch).
pub trait Vcs: Send + Sync {
    /// Newest-first `git log` page formatted with [`LOG_FORMAT`].
    fn log(&self, limit: usize) -> Result<String, GitError>;
    /// Working-tree diff, or the diff between two commits.
    fn diff(&self, range: Option<(&str, &str)>) -> Result<String, GitError>;
    fn show(&self, reference: &str) -> Result<String, GitError>;
    fn current_branch(&self) -> Result<String, GitError>;
    fn delete_branch(&self, name: &str) -> Result<(), GitError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to execute {binary}: {message}")]
    Exec { binary: String, message: String },

    #[error("not a git repository: {}", .0.display())]
    NotARepo(PathBuf),

    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },
}

#[derive(Debug, Clone)]
pub struct GitManager {
    repo_path: PathBuf,
    binary: String,
}

impl GitManager {
    /// Opens the repository containing `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, GitError> {
        Self::with_binary(path, "git")
    }

    pub fn with_binary(path: impl AsRef<Path>, binary: &str) -> Result<Self, GitError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(GitError::NotARepo(path.to_path_buf()));
        }

        let output = Command::new(binary)
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()
            .map_err(|e| GitError::Exec {
                binary: binary.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GitError::NotARepo(path.to_path_buf()));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self {
            repo_path: PathBuf::from(root),
            binary: binary.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.repo_path
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        tracing::debug!("running {} {}", self.binary, args.join(" "));
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| GitError::Exec {
                binary: self.binary.clone(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(GitError::Failed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Vcs for GitManager {
    fn log(&self, limit: usize) -> Result<String, GitError> {
        let count = limit.to_string();
        let format = format!("--pretty=format:{}", LOG_FORMAT);
        self.run(&["log", "-n", &count, &format])
    }

    fn diff(&self, range: Option<(&str, &str)>) -> Result<String, GitError> {
        match range {
            Some((from, to)) => self.run(&["diff", END_OF_OPTIONS, from, to]),
            None => self.run(&["diff"]),
        }
    }

    fn show(&self, reference: &str) -> Result<String, GitError> {
        self.run(&["show", END_OF_OPTIONS, reference])
    }

    fn current_branch(&self) -> Result<String, GitError> {
        Ok(self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    fn delete_branch(&self, name: &str) -> Result<(), GitError> {
        self.run(&["branch", "-D", name]).map(|_| ())
    }
}
