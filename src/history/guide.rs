use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::range::CommitRange;
use super::summary::SummaryResult;

/// Line typed into the interactive rebase editor to squash everything after the first pick.
pub const SQUASH_SCRIPT: &str = "2,$s/pick/squash/g";

/// Suffix of the scratch branch used to replay the squashed commit.
pub const TEMP_BRANCH_SUFFIX: &str = "_tmp";

pub fn temp_branch_name(branch: &str) -> String {
    format!("{}{}", branch, TEMP_BRANCH_SUFFIX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum StepBody {
    /// Text to copy, such as the new commit message.
    Text(String),
    /// Arguments of a single git invocation, without the program name.
    Git(String),
    /// Line to type or run as is.
    Command(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GuideStep {
    pub title: String,
    pub body: StepBody,
}

impl GuideStep {
    fn command(title: &str, command: String) -> Self {
        Self {
            title: title.to_string(),
            body: StepBody::Command(command),
        }
    }

    fn git(title: &str, args: String) -> Self {
        Self {
            title: title.to_string(),
            body: StepBody::Git(args),
        }
    }

    fn text(title: &str, text: String) -> Self {
        Self {
            title: title.to_string(),
            body: StepBody::Text(text),
        }
    }

    /// The command as stored in the step: git arguments or a verbatim line.
    pub fn command_text(&self) -> Option<&str> {
        match &self.body {
            StepBody::Git(c) | StepBody::Command(c) => Some(c),
            StepBody::Text(_) => None,
        }
    }

    /// What the user types, with `git` in front of git steps.
    pub fn command_line(&self) -> Option<String> {
        match &self.body {
            StepBody::Git(args) => Some(format!("git {}", args)),
            StepBody::Command(c) => Some(c.clone()),
            StepBody::Text(_) => None,
        }
    }
}

/// Follow-up the panel may send back from the guide view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GuideAction {
    #[serde(rename_all = "camelCase")]
    ShowChangeBetweenCommit { older: String, newer: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RebaseGuide {
    pub older_hash: String,
    pub newer_hash: String,
    pub branch: String,
    pub commit_count: usize,
    pub message: String,
    pub steps: Vec<GuideStep>,
    pub actions: Vec<GuideAction>,
}

impl RebaseGuide {
    /// Plain-text rendering, one numbered step per block.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            out.push_str(&format!("Step {}: {}\n", i + 1, step.title));
            if let Some(line) = step.command_line() {
                out.push_str(&format!("  $ {}\n", line));
            } else if let StepBody::Text(t) = &step.body {
                for line in t.lines() {
                    out.push_str(&format!("  {}\n", line));
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Descriptor the guide view offers for showing the combined diff of the range.
pub fn request_changes_between(older: &str, newer: &str) -> GuideAction {
    GuideAction::ShowChangeBetweenCommit {
        older: older.to_string(),
        newer: newer.to_string(),
    }
}

/// Builds the squash walkthrough for `range`. Nothing here touches the repository.
pub fn render(range: &CommitRange, summary: &SummaryResult, branch: &str) -> RebaseGuide {
    let older = &range.older_hash;
    let newer = &range.newer_hash;
    let temp = temp_branch_name(branch);
    let message = summary.render();

    let steps = vec![
        GuideStep::git(
            "Start an interactive rebase over the selected commits",
            format!("rebase -i {}^ {}", older, newer),
        ),
        GuideStep::command(
            "In the rebase editor, run this substitution to squash every pick after the first",
            SQUASH_SCRIPT.to_string(),
        ),
        GuideStep::text("Replace the combined commit message with", message.clone()),
        GuideStep::git(
            "Save the squashed result on a temporary branch",
            format!("checkout -b {}", temp),
        ),
        GuideStep::command(
            "Return to your branch and replay it on top of the squash",
            format!("git checkout {} && git rebase {}", branch, temp),
        ),
    ];

    RebaseGuide {
        older_hash: older.clone(),
        newer_hash: newer.clone(),
        branch: branch.to_string(),
        commit_count: range.len(),
        message,
        steps,
        actions: vec![request_changes_between(older, newer)],
    }
}
