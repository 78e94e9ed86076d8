use anyhow::Result;
use std::io::{self, Write};
use tokio::sync::mpsc;

use super::{ErrorKind, PanelEnd, ViewDocument, ViewMessage};
use crate::history::{CommitRecord, SelectionEvent, SelectionState, StepBody};
use crate::theme::Theme;

const HELP: &str = "\
Commands:
  check N | x N     mark commit N (two marks start the squash guide)
  uncheck N | u N   clear the mark on commit N
  show N            show commit N
  diff N M          show the changes between commits N and M
  list              print the log again
  help              print this help
  quit              close the panel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Check(usize),
    Uncheck(usize),
    Show(usize),
    Diff(usize, usize),
    List,
    Help,
    Quit,
}

/// Parses one input line. Row numbers are 1-based as printed.
pub fn parse_command(line: &str) -> Result<PanelCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let row = |word: &str| -> Result<usize, String> {
        match word.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n - 1),
            _ => Err(format!("'{}' is not a row number", word)),
        }
    };

    match words.as_slice() {
        ["check" | "x", n] => Ok(PanelCommand::Check(row(*n)?)),
        ["uncheck" | "u", n] => Ok(PanelCommand::Uncheck(row(*n)?)),
        ["show", n] => Ok(PanelCommand::Show(row(*n)?)),
        ["diff", a, b] => Ok(PanelCommand::Diff(row(*a)?, row(*b)?)),
        ["list" | "ls"] => Ok(PanelCommand::List),
        ["help" | "?"] => Ok(PanelCommand::Help),
        ["quit" | "q" | "exit"] => Ok(PanelCommand::Quit),
        [] => Err(String::new()),
        _ => Err(format!("unknown command '{}', type 'help'", line.trim())),
    }
}

/// Interactive line-oriented panel on stdin/stdout.
///
/// Keeps its own copy of the selection so that marks show up immediately;
/// the session only hears about the pair once it is complete.
pub struct TerminalPanel {
    theme: Theme,
    branch: String,
    commits: Vec<CommitRecord>,
    selection: SelectionState,
    awaiting_guide: bool,
}

impl TerminalPanel {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            branch: String::new(),
            commits: Vec::new(),
            selection: SelectionState::new(),
            awaiting_guide: false,
        }
    }

    pub async fn run(mut self, mut input: mpsc::Receiver<String>, mut end: PanelEnd) -> Result<()> {
        let mut prompt_shown = false;

        loop {
            if !prompt_shown && !self.commits.is_empty() && !self.awaiting_guide {
                print!("log> ");
                io::stdout().flush()?;
                prompt_shown = true;
            }

            tokio::select! {
                document = end.documents.recv() => {
                    let Some(document) = document else { break };
                    println!("{}", self.apply(document));
                    prompt_shown = false;
                }
                line = input.recv() => {
                    let Some(line) = line else { break };
                    prompt_shown = false;
                    match self.on_input(&line) {
                        Ok(Some(message)) => {
                            if end.messages.send(message).await.is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(Quit) => break,
                    }
                }
            }
        }
        Ok(())
    }

    /// Updates local state from a document and returns the text to print.
    pub fn apply(&mut self, document: ViewDocument) -> String {
        match document {
            ViewDocument::Log { branch, commits } => {
                self.branch = branch;
                self.commits = commits;
                self.selection.clear();
                self.render_log()
            }
            ViewDocument::Guide(guide) => {
                self.awaiting_guide = false;
                self.selection.clear();
                let mut out = format!(
                    "{}\n\n",
                    self.theme.header.apply(&format!(
                        "Squash {} commit(s) on {}",
                        guide.commit_count, guide.branch
                    ))
                );
                for (i, step) in guide.steps.iter().enumerate() {
                    out.push_str(&format!("Step {}: {}\n", i + 1, step.title));
                    if let Some(line) = step.command_line() {
                        out.push_str(&format!("  {}\n\n", self.theme.command.apply(&line)));
                    } else if let StepBody::Text(t) = &step.body {
                        for line in t.lines() {
                            out.push_str(&format!("  {}\n", self.theme.message.apply(line)));
                        }
                        out.push('\n');
                    }
                }
                out.push_str(&format!(
                    "Type 'diff {} {}' to see the changes of the whole range.",
                    self.row_of(&guide.older_hash).map_or(0, |r| r + 1),
                    self.row_of(&guide.newer_hash).map_or(0, |r| r + 1),
                ));
                out
            }
            ViewDocument::Detail { request, text } => {
                format!("{}\n{}", self.theme.header.apply(&request.title()), text)
            }
            ViewDocument::Error {
                kind,
                message,
                remediation,
            } => {
                if self.awaiting_guide && kind != ErrorKind::Vcs {
                    self.selection.clear();
                }
                self.awaiting_guide = false;
                let mut out = format!("{}: {}", self.theme.warning.apply("Error"), message);
                if let Some(hint) = remediation {
                    out.push_str(&format!("\n{}", hint));
                }
                out
            }
        }
    }

    /// Handles one input line; `Ok(Some(_))` is a message for the session.
    pub fn on_input(&mut self, line: &str) -> Result<Option<ViewMessage>, Quit> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                if !e.is_empty() {
                    println!("{}", e);
                }
                return Ok(None);
            }
        };

        if self.awaiting_guide
            && !matches!(command, PanelCommand::Quit | PanelCommand::Help | PanelCommand::List)
        {
            println!("Still waiting for the squash guide; 'quit' leaves the panel.");
            return Ok(None);
        }

        let message = match command {
            PanelCommand::Quit => return Err(Quit),
            PanelCommand::Help => {
                println!("{}", HELP);
                None
            }
            PanelCommand::List => {
                println!("{}", self.render_log());
                None
            }
            PanelCommand::Check(row) => {
                let Some(hash) = self.hash_at(row) else {
                    return Ok(None);
                };
                match self.selection.check(&hash) {
                    Some(SelectionEvent::PairSelected(a, b)) => {
                        println!("{}", self.render_log());
                        println!("Generating squash message, please wait...");
                        self.awaiting_guide = true;
                        Some(ViewMessage::SelectedCommits { commits: vec![a, b] })
                    }
                    None => {
                        println!("{}", self.render_log());
                        None
                    }
                }
            }
            PanelCommand::Uncheck(row) => {
                if let Some(hash) = self.hash_at(row) {
                    self.selection.uncheck(&hash);
                    println!("{}", self.render_log());
                }
                None
            }
            PanelCommand::Show(row) => self
                .hash_at(row)
                .map(|hash| ViewMessage::ShowDetail { hash }),
            PanelCommand::Diff(a, b) => match (self.hash_at(a), self.hash_at(b)) {
                (Some(first), Some(second)) => {
                    let (older, newer) = if a >= b { (first, second) } else { (second, first) };
                    Some(ViewMessage::ShowChangeBetweenCommit { older, newer })
                }
                _ => None,
            },
        };
        Ok(message)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    fn hash_at(&self, row: usize) -> Option<String> {
        let hash = self.commits.get(row).map(|c| c.full_hash.clone());
        if hash.is_none() {
            println!("no commit at row {}", row + 1);
        }
        hash
    }

    fn row_of(&self, hash: &str) -> Option<usize> {
        self.commits.iter().position(|c| c.full_hash == hash)
    }

    fn render_log(&self) -> String {
        let mut out = format!(
            "{}\n",
            self.theme
                .header
                .apply(&format!("Recent commits on {}", self.branch))
        );
        for (i, commit) in self.commits.iter().enumerate() {
            let mark = if self.selection.is_checked(&commit.full_hash) {
                self.theme.checked.apply("[x]")
            } else {
                "[ ]".into()
            };
            out.push_str(&format!(
                "{:>3} {} {} {} {}\n",
                i + 1,
                mark,
                self.theme.hash.apply(&commit.short_hash),
                self.theme.author.apply(&commit.author),
                commit.short_message
            ));
        }
        out.push_str("Check two commits to get a squash guide. Type 'help' for commands.");
        out
    }
}

/// Returned by [`TerminalPanel::on_input`] when the user closes the panel.
#[derive(Debug, PartialEq, Eq)]
pub struct Quit;
