use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::collections::HashSet;

/// Separator placed between the fields of one `git log` record.
///
/// Four characters so it will not show up in author names or subjects.
pub const FIELD_DELIMITER: &str = "-||-";

/// Pretty format handed to `git log` so that every line parses into a [`CommitRecord`].
pub const LOG_FORMAT: &str = "%H-||-%h-||-%an-||-%s";

/// Subjects longer than this are cut for display.
pub const SHORT_MESSAGE_LIMIT: usize = 100;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub full_hash: String,
    pub short_hash: String,
    pub author: String,
    /// Full subject line, used when asking for a squash summary.
    pub subject: String,
    /// Subject cut to [`SHORT_MESSAGE_LIMIT`] characters for the panel.
    pub short_message: String,
}

impl CommitRecord {
    pub fn new(full_hash: &str, short_hash: &str, author: &str, subject: &str) -> Self {
        Self {
            full_hash: full_hash.to_string(),
            short_hash: short_hash.to_string(),
            author: author.to_string(),
            subject: subject.to_string(),
            short_message: shorten(subject),
        }
    }
}

/// Commits in the order `git log` printed them: newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitLog {
    records: Vec<CommitRecord>,
}

impl CommitLog {
    pub fn records(&self) -> &[CommitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CommitRecord> {
        self.records.get(index)
    }

    pub fn position(&self, hash: &str) -> Option<usize> {
        self.records.iter().position(|r| r.full_hash == hash)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.position(hash).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("log line {line_number} has {fields} field(s), expected 4: {line:?}")]
pub struct ParseError {
    pub line_number: usize,
    pub fields: usize,
    pub line: String,
}

/// Parses a single delimited line.
pub fn parse_line(line_number: usize, line: &str) -> Result<CommitRecord, ParseError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    match fields.as_slice() {
        [full, short, author, subject] => Ok(CommitRecord::new(full, short, author, subject)),
        _ => Err(ParseError {
            line_number,
            fields: fields.len(),
            line: line.to_string(),
        }),
    }
}

/// Parses raw `git log` output into a [`CommitLog`].
///
/// Malformed lines (blank trailing lines included) and repeated hashes are
/// dropped with a debug log rather than failing the whole page.
pub fn parse(raw_log: &str) -> CommitLog {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (index, line) in raw_log.lines().enumerate() {
        let record = match parse_line(index + 1, line) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("dropping log line: {}", e);
                continue;
            }
        };

        if !seen.insert(record.full_hash.clone()) {
            tracing::debug!("dropping duplicate commit {}", record.full_hash);
            continue;
        }
        records.push(record);
    }

    CommitLog { records }
}

fn shorten(subject: &str) -> String {
    if subject.chars().count() > SHORT_MESSAGE_LIMIT {
        let cut: String = subject.chars().take(SHORT_MESSAGE_LIMIT).collect();
        format!("{}{}", cut, ELLIPSIS)
    } else {
        subject.to_string()
    }
}
