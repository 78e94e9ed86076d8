//! One-shot helpers: commit message for the working tree, and comments for a
//! range of lines.

use std::fmt;
use std::str::FromStr;

use crate::ai::TextCompletion;
use crate::error::WorkflowError;
use crate::git::Vcs;
use crate::history::summary::{apply_ticket_prefix, TicketStrategy};
use crate::prompts;

/// Drafts a commit message for the uncommitted changes.
///
/// `Ok(None)` when there is nothing to describe or the service returned nothing.
pub async fn commit_message(
    vcs: &dyn Vcs,
    completion: &dyn TextCompletion,
    tickets: &dyn TicketStrategy,
) -> Result<Option<String>, WorkflowError> {
    let diff = vcs.diff(None)?;
    if diff.trim().is_empty() {
        tracing::info!("working tree has no changes");
        return Ok(None);
    }

    let Some(body) = completion.complete(&prompts::commit_prompt(&diff)).await? else {
        return Ok(None);
    };
    let branch = vcs.current_branch()?;
    Ok(Some(apply_ticket_prefix(tickets, &branch, &body)))
}

/// Inclusive 1-based line range, written `START:END`. Always has `1 <= start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Result<Self, WorkflowError> {
        if start == 0 || end < start {
            return Err(WorkflowError::InvalidSelection(format!(
                "line range {}:{} must satisfy 1 <= START <= END",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

impl FromStr for LineRange {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WorkflowError::InvalidSelection(format!("'{}' is not START:END", s));
        let (start, end) = s.split_once(':').ok_or_else(invalid)?;
        let start: usize = start.trim().parse().map_err(|_| invalid())?;
        let end: usize = end.trim().parse().map_err(|_| invalid())?;
        Self::new(start, end)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotateMode {
    /// Add comments to code.
    Comment,
    /// Rewrite an existing comment.
    Polish,
}

/// Returns the selected lines of `source` joined with `\n`.
pub fn select_lines(source: &str, range: LineRange) -> Result<String, WorkflowError> {
    let lines: Vec<&str> = source.lines().collect();
    if range.end > lines.len() {
        return Err(WorkflowError::InvalidSelection(format!(
            "line range {} is past the end of the file ({} lines)",
            range,
            lines.len()
        )));
    }
    Ok(lines[range.start - 1..range.end].join("\n"))
}

/// Replaces the selected lines of `source` with `replacement`, keeping the
/// file's line ending (`\r\n` or `\n`).
pub fn splice(source: &str, range: LineRange, replacement: &str) -> String {
    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let lines: Vec<&str> = source.lines().collect();
    let end = range.end.min(lines.len());
    let start = (range.start - 1).min(end);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..start]);
    out.extend(replacement.lines());
    out.extend_from_slice(&lines[end..]);

    let mut text = out.join(newline);
    if source.ends_with('\n') {
        text.push_str(newline);
    }
    text
}

/// Asks the service to comment or polish the selected lines.
pub async fn annotate(
    completion: &dyn TextCompletion,
    mode: AnnotateMode,
    source: &str,
    range: LineRange,
) -> Result<Option<String>, WorkflowError> {
    let selected = select_lines(source, range)?;
    let prompt = match mode {
        AnnotateMode::Comment => prompts::comment_prompt(&selected),
        AnnotateMode::Polish => prompts::polish_prompt(&selected),
    };
    tracing::debug!(?mode, lines = %range, "requesting annotation");
    Ok(completion.complete(&prompt).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AIError;
    use crate::git::GitError;
    use crate::history::BranchTicketPattern;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Echo(Option<&'static str>);

    #[async_trait]
    impl TextCompletion for Echo {
        async fn complete(&self, _prompt: &str) -> Result<Option<String>, AIError> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct Tree {
        diff: &'static str,
        branch: &'static str,
    }

    impl Vcs for Tree {
        fn log(&self, _limit: usize) -> Result<String, GitError> {
            Ok(String::new())
        }
        fn diff(&self, _range: Option<(&str, &str)>) -> Result<String, GitError> {
            Ok(self.diff.to_string())
        }
        fn show(&self, _reference: &str) -> Result<String, GitError> {
            Ok(String::new())
        }
        fn current_branch(&self) -> Result<String, GitError> {
            Ok(self.branch.to_string())
        }
        fn delete_branch(&self, _name: &str) -> Result<(), GitError> {
            Ok(())
        }
    }

    #[test]
    fn test_line_range_parsing() {
        assert_eq!("3:5".parse::<LineRange>().unwrap(), LineRange::new(3, 5).unwrap());
        assert!("0:2".parse::<LineRange>().is_err());
        assert!(LineRange::new(0, 0).is_err());
        assert!("5:3".parse::<LineRange>().is_err());
        assert!("7".parse::<LineRange>().is_err());
    }

    #[test]
    fn test_select_and_splice() {
        let source = "a\nb\nc\nd\n";
        let range = LineRange::new(2, 3).unwrap();
        assert_eq!(select_lines(source, range).unwrap(), "b\nc");
        assert_eq!(splice(source, range, "// note\nb\nc"), "a\n// note\nb\nc\nd\n");
        assert!(select_lines(source, LineRange::new(4, 9).unwrap()).is_err());
    }

    #[test]
    fn test_splice_keeps_crlf() {
        let source = "a\r\nb\r\nc\r\n";
        let range = LineRange::new(2, 2).unwrap();
        assert_eq!(select_lines(source, range).unwrap(), "b");
        assert_eq!(splice(source, range, "// note\nb"), "a\r\n// note\r\nb\r\nc\r\n");
    }

    #[tokio::test]
    async fn test_commit_message_gets_ticket_prefix() {
        let tree = Tree {
            diff: "+ fn main() {}",
            branch: "feature/ABC-123-foo",
        };
        let message = commit_message(&tree, &Echo(Some("#comment add main")), &BranchTicketPattern::default())
            .await
            .unwrap();
        assert_eq!(message.as_deref(), Some("ABC-123 #comment add main"));
    }

    #[tokio::test]
    async fn test_commit_message_on_clean_tree() {
        let tree = Tree { diff: "\n", branch: "main" };
        let message = commit_message(&tree, &Echo(Some("unused")), &BranchTicketPattern::default())
            .await
            .unwrap();
        assert_eq!(message, None);
    }

    #[tokio::test]
    async fn test_annotate_returns_service_text() {
        let result = annotate(
            &Echo(Some("// adds one\nx + 1")),
            AnnotateMode::Comment,
            "x + 1\n",
            LineRange::new(1, 1).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(result.as_deref(), Some("// adds one\nx + 1"));
    }
}
