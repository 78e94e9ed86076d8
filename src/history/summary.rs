use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;

use crate::ai::TextCompletion;
use crate::error::WorkflowError;
use crate::prompts;

/// Pulls an issue-tracker key out of a branch name.
pub trait TicketStrategy: Send + Sync {
    fn extract(&self, branch: &str) -> Option<String>;
}

/// Matches a `/ABC-123` style segment, as in `feature/ABC-123-login`.
#[derive(Debug, Clone)]
pub struct BranchTicketPattern {
    pattern: Regex,
}

impl BranchTicketPattern {
    pub const DEFAULT_PATTERN: &'static str = r"/([A-Z]+-\d+)";

    /// Builds a strategy from a custom regex. The first capture group is the ticket.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Default for BranchTicketPattern {
    fn default() -> Self {
        Self {
            pattern: Regex::new(Self::DEFAULT_PATTERN).expect("default ticket pattern compiles"),
        }
    }
}

impl TicketStrategy for BranchTicketPattern {
    fn extract(&self, branch: &str) -> Option<String> {
        self.pattern
            .captures(branch)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    /// Empty when the branch carries no ticket key.
    pub ticket_prefix: String,
    pub body_text: String,
}

impl SummaryResult {
    pub fn new(strategy: &dyn TicketStrategy, branch: &str, body: &str) -> Self {
        Self {
            ticket_prefix: strategy.extract(branch).unwrap_or_default(),
            body_text: body.to_string(),
        }
    }

    /// `"<ticket> <body>"`. Without a ticket the result still starts with a space,
    /// matching the output editors already consume.
    pub fn render(&self) -> String {
        format!("{} {}", self.ticket_prefix, self.body_text)
    }

    /// Same as [`render`](Self::render) without the leading space.
    pub fn trimmed(&self) -> String {
        self.render().trim_start().to_string()
    }
}

/// Prepends the ticket found in `branch` to `body`.
pub fn apply_ticket_prefix(strategy: &dyn TicketStrategy, branch: &str, body: &str) -> String {
    SummaryResult::new(strategy, branch, body).render()
}

/// Asks `completion` for one message summarizing `messages` and tags it with the branch ticket.
pub async fn summarize(
    completion: &dyn TextCompletion,
    strategy: &dyn TicketStrategy,
    branch: &str,
    messages: &[String],
) -> Result<SummaryResult, WorkflowError> {
    let prompt = prompts::squash_prompt(messages);
    tracing::debug!(commits = messages.len(), "requesting squash summary");

    let body = completion
        .complete(&prompt)
        .await?
        .filter(|text| !text.trim().is_empty())
        .ok_or(WorkflowError::EmptySummary)?;

    Ok(SummaryResult::new(strategy, branch, &body))
}
