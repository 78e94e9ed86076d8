use std::path::PathBuf;

use crate::ai::AIError;
use crate::git::GitError;

/// Failures of one step of the squash workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("commit {0} is not part of the loaded log")]
    HashNotFound(String),

    #[error("no git workspace found at {}", .0.display())]
    MissingWorkspace(PathBuf),

    #[error(transparent)]
    Completion(#[from] AIError),

    #[error(transparent)]
    Vcs(#[from] GitError),

    #[error("text completion returned no result")]
    EmptySummary,

    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl WorkflowError {
    /// True when the completion service rejected the stored credential.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Completion(AIError::AuthenticationError(_)))
    }
}
