//! Commit history workflow: parse the log, pick two commits, summarize and
//! explain how to squash everything between them.

pub mod detail;
pub mod guide;
pub mod log_parser;
pub mod range;
pub mod selection;
pub mod summary;

pub use detail::DiffRequest;
pub use guide::{GuideAction, GuideStep, RebaseGuide, StepBody};
pub use log_parser::{parse, CommitLog, CommitRecord, ParseError};
pub use range::{resolve, CommitRange};
pub use selection::{SelectionEvent, SelectionState};
pub use summary::{apply_ticket_prefix, BranchTicketPattern, SummaryResult, TicketStrategy};
