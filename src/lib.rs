pub mod ai;
pub mod assist;
pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod panel;
pub mod prompts;
pub mod session;
pub mod theme;
pub mod workspace;

// Re-export commonly used types
pub use ai::{AIError, CompletionClient, TextCompletion};
pub use config::Config;
pub use error::WorkflowError;
pub use git::{GitError, GitManager, Vcs};
pub use panel::{ViewDocument, ViewMessage};
pub use session::{LogSession, SessionState};
