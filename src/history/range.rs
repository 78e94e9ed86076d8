use super::log_parser::{CommitLog, CommitRecord};
use crate::error::WorkflowError;

/// Inclusive window of commits between two selected endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub older_hash: String,
    pub newer_hash: String,
    /// Records from the log between both endpoints, endpoints included, in log order.
    pub commits: Vec<CommitRecord>,
}

impl CommitRange {
    /// Full subjects of every commit in the range, used to request the summary.
    pub fn messages(&self) -> Vec<String> {
        self.commits.iter().map(|c| c.subject.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Orders two hashes by their position in `log` and collects the commits between them.
///
/// The argument order does not matter. A hash paired with itself gives a
/// single-commit range.
pub fn resolve(hash_a: &str, hash_b: &str, log: &CommitLog) -> Result<CommitRange, WorkflowError> {
    let index_a = log
        .position(hash_a)
        .ok_or_else(|| WorkflowError::HashNotFound(hash_a.to_string()))?;
    let index_b = log
        .position(hash_b)
        .ok_or_else(|| WorkflowError::HashNotFound(hash_b.to_string()))?;

    // The log is newest first, so the smaller index is the newer commit.
    let (newer, older) = if index_a <= index_b {
        (index_a, index_b)
    } else {
        (index_b, index_a)
    };

    let commits = log.records()[newer..=older].to_vec();

    Ok(CommitRange {
        older_hash: log.records()[older].full_hash.clone(),
        newer_hash: log.records()[newer].full_hash.clone(),
        commits,
    })
}
