//! Drives one "show log" session from the loaded log to the rendered guide.

use std::sync::Arc;

use crate::ai::TextCompletion;
use crate::error::WorkflowError;
use crate::git::Vcs;
use crate::history::guide::{self, temp_branch_name};
use crate::history::summary::{self, TicketStrategy};
use crate::history::{parse, resolve, CommitLog, DiffRequest, SelectionEvent, SelectionState};
use crate::panel::{ErrorKind, PanelHandle, ViewDocument, ViewMessage};

pub const AUTH_REMEDIATION: &str =
    "The API key was rejected. Run `dev-helper clear-key` to remove it and try again.";

pub const GUIDE_ALREADY_RENDERED: &str =
    "a squash guide was already rendered; start a new session to pick another range";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    LogLoaded,
    Selecting,
    PairSelected,
    RangeResolved,
    SummaryRequested,
    SummaryReady,
    GuideRendered,
    Failed,
}

pub struct LogSession {
    vcs: Arc<dyn Vcs>,
    completion: Arc<dyn TextCompletion>,
    tickets: Box<dyn TicketStrategy>,
    state: SessionState,
    log: CommitLog,
    branch: String,
    selection: SelectionState,
}

impl LogSession {
    pub fn new(
        vcs: Arc<dyn Vcs>,
        completion: Arc<dyn TextCompletion>,
        tickets: Box<dyn TicketStrategy>,
    ) -> Self {
        Self {
            vcs,
            completion,
            tickets,
            state: SessionState::Idle,
            log: CommitLog::default(),
            branch: String::new(),
            selection: SelectionState::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn log(&self) -> &CommitLog {
        &self.log
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!("session {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Reads one page of history and returns the document for the log view.
    pub fn load(&mut self, limit: usize) -> Result<ViewDocument, WorkflowError> {
        let raw = self.vcs.log(limit)?;
        self.log = parse(&raw);
        self.branch = self.vcs.current_branch()?;
        self.selection.clear();
        tracing::info!(commits = self.log.len(), branch = %self.branch, "loaded commit log");
        self.transition(SessionState::LogLoaded);

        Ok(ViewDocument::Log {
            branch: self.branch.clone(),
            commits: self.log.records().to_vec(),
        })
    }

    /// Loads the log, shows it, then serves panel messages until the panel hangs up.
    pub async fn run(mut self, mut panel: PanelHandle, limit: usize) -> Result<(), WorkflowError> {
        let document = match self.load(limit) {
            Ok(document) => document,
            Err(e) => {
                self.transition(SessionState::Failed);
                let _ = panel.documents.send(error_document(&e)).await;
                return Err(e);
            }
        };
        if panel.documents.send(document).await.is_err() {
            return Ok(());
        }

        while let Some(message) = panel.messages.recv().await {
            let Some(document) = self.handle(message).await else {
                continue;
            };
            if panel.documents.send(document).await.is_err() {
                break;
            }
        }

        tracing::debug!("panel closed in state {:?}", self.state);
        Ok(())
    }

    /// Handles one panel message to completion and returns what to show next, if anything.
    pub async fn handle(&mut self, message: ViewMessage) -> Option<ViewDocument> {
        if self.state == SessionState::Idle {
            tracing::warn!("ignoring {:?} before the log is loaded", message);
            return None;
        }

        match message {
            ViewMessage::SelectedCommits { commits } => self.on_selected(&commits).await,
            ViewMessage::ShowDetail { hash } => {
                Some(self.detail(&[hash.as_str()], DiffRequest::for_commit(&hash)))
            }
            ViewMessage::ShowChangeBetweenCommit { older, newer } => Some(self.detail(
                &[older.as_str(), newer.as_str()],
                DiffRequest::for_range(&older, &newer),
            )),
        }
    }

    async fn on_selected(&mut self, commits: &[String]) -> Option<ViewDocument> {
        if self.state == SessionState::GuideRendered {
            // The panel waits for an answer to every pair it sends.
            return Some(error_document(&WorkflowError::InvalidSelection(
                GUIDE_ALREADY_RENDERED.to_string(),
            )));
        }

        self.transition(SessionState::Selecting);
        self.selection.clear();
        let mut pair = None;
        for hash in commits {
            if let Some(SelectionEvent::PairSelected(a, b)) = self.selection.check(hash) {
                pair = Some((a, b));
            }
        }

        let Some((a, b)) = pair else {
            tracing::debug!("selection incomplete: {:?}", self.selection.checked());
            return None;
        };
        self.transition(SessionState::PairSelected);

        match self.squash_guide(&a, &b).await {
            Ok(document) => Some(document),
            Err(e) => {
                self.selection.clear();
                self.transition(SessionState::Failed);
                Some(error_document(&e))
            }
        }
    }

    async fn squash_guide(&mut self, a: &str, b: &str) -> Result<ViewDocument, WorkflowError> {
        let range = resolve(a, b, &self.log)?;
        self.transition(SessionState::RangeResolved);

        self.transition(SessionState::SummaryRequested);
        let summary = summary::summarize(
            self.completion.as_ref(),
            self.tickets.as_ref(),
            &self.branch,
            &range.messages(),
        )
        .await?;
        self.transition(SessionState::SummaryReady);

        let guide = guide::render(&range, &summary, &self.branch);
        self.transition(SessionState::GuideRendered);
        self.cleanup_temp_branch();
        Ok(ViewDocument::Guide(guide))
    }

    /// Drops the scratch branch a previous guide told the user to create.
    /// Runs in the background and never holds up the session; failure is only logged.
    fn cleanup_temp_branch(&self) {
        let vcs = Arc::clone(&self.vcs);
        let temp = temp_branch_name(&self.branch);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = vcs.delete_branch(&temp) {
                tracing::warn!("could not delete {}: {}", temp, e);
            }
        });
    }

    /// Runs `request` once every hash it names is part of the loaded log.
    fn detail(&self, hashes: &[&str], request: DiffRequest) -> ViewDocument {
        if let Some(unknown) = hashes.iter().find(|hash| !self.log.contains(hash)) {
            return error_document(&WorkflowError::HashNotFound(unknown.to_string()));
        }
        match request.run(self.vcs.as_ref()) {
            Ok(text) => ViewDocument::Detail { request, text },
            Err(e) => error_document(&WorkflowError::Vcs(e)),
        }
    }
}

/// Maps a failed step to what the panel should show.
pub fn error_document(error: &WorkflowError) -> ViewDocument {
    let (kind, remediation) = match error {
        e if e.is_auth() => (ErrorKind::Auth, Some(AUTH_REMEDIATION.to_string())),
        WorkflowError::EmptySummary => (ErrorKind::EmptySummary, None),
        WorkflowError::Vcs(_) => (ErrorKind::Vcs, None),
        WorkflowError::Completion(_) => (ErrorKind::Completion, None),
        WorkflowError::InvalidSelection(_) => (ErrorKind::Selection, None),
        WorkflowError::HashNotFound(_) | WorkflowError::MissingWorkspace(_) => {
            (ErrorKind::Internal, None)
        }
    };

    if kind == ErrorKind::Internal {
        tracing::error!("workflow aborted: {}", error);
    } else {
        tracing::warn!("workflow step failed: {}", error);
    }

    ViewDocument::Error {
        kind,
        message: error.to_string(),
        remediation,
    }
}
