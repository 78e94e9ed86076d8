//! Message boundary between the session and whatever draws the commit panel.
//!
//! The panel sends [`ViewMessage`]s and receives [`ViewDocument`]s. Each
//! document replaces what the panel showed before.

pub mod json;
pub mod terminal;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::history::{CommitRecord, DiffRequest, RebaseGuide};

const CHANNEL_CAPACITY: usize = 16;

/// Inbound events from the panel, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewMessage {
    /// The panel's selection reached two commits, in the order they were checked.
    SelectedCommits { commits: Vec<String> },
    ShowDetail { hash: String },
    #[serde(rename_all = "camelCase")]
    ShowChangeBetweenCommit { older: String, newer: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Auth,
    EmptySummary,
    Vcs,
    Internal,
    Completion,
    /// The selection was refused; the session state is unchanged.
    Selection,
}

/// Outbound render requests, tagged by `view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ViewDocument {
    Log {
        branch: String,
        commits: Vec<CommitRecord>,
    },
    Guide(RebaseGuide),
    Detail {
        request: DiffRequest,
        text: String,
    },
    Error {
        kind: ErrorKind,
        message: String,
        remediation: Option<String>,
    },
}

/// Session side of the panel connection.
pub struct PanelHandle {
    pub messages: mpsc::Receiver<ViewMessage>,
    pub documents: mpsc::Sender<ViewDocument>,
}

/// Panel side of the connection.
pub struct PanelEnd {
    pub messages: mpsc::Sender<ViewMessage>,
    pub documents: mpsc::Receiver<ViewDocument>,
}

/// Creates a connected pair of channel ends.
pub fn channel() -> (PanelHandle, PanelEnd) {
    let (message_tx, message_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (document_tx, document_rx) = mpsc::channel(CHANNEL_CAPACITY);
    (
        PanelHandle {
            messages: message_rx,
            documents: document_tx,
        },
        PanelEnd {
            messages: message_tx,
            documents: document_rx,
        },
    )
}

/// Reads stdin lines on a dedicated thread.
///
/// Blocking terminal reads stay off the runtime, and the thread dies with the
/// process instead of holding up runtime shutdown.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// JSON Schema for both directions of the panel protocol.
pub fn protocol_schema() -> serde_json::Value {
    serde_json::json!({
        "viewMessage": schemars::schema_for!(ViewMessage),
        "viewDocument": schemars::schema_for!(ViewDocument),
    })
}
