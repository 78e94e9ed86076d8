use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::git::{GitError, Vcs};

/// What to ask the VCS for when the panel wants to show details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiffRequest {
    Show {
        #[serde(rename = "ref")]
        reference: String,
    },
    Diff {
        from: String,
        to: String,
    },
}

impl DiffRequest {
    pub fn for_commit(hash: &str) -> Self {
        Self::Show {
            reference: hash.to_string(),
        }
    }

    pub fn for_range(older: &str, newer: &str) -> Self {
        Self::Diff {
            from: older.to_string(),
            to: newer.to_string(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Show { reference } => format!("Commit {}", reference),
            Self::Diff { from, to } => format!("Changes {}..{}", from, to),
        }
    }

    pub fn run(&self, vcs: &dyn Vcs) -> Result<String, GitError> {
        match self {
            Self::Show { reference } => vcs.show(reference),
            Self::Diff { from, to } => vcs.diff(Some((from.as_str(), to.as_str()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shapes() {
        assert_eq!(
            DiffRequest::for_commit("abc"),
            DiffRequest::Show {
                reference: "abc".into()
            }
        );
        assert_eq!(
            DiffRequest::for_range("old", "new"),
            DiffRequest::Diff {
                from: "old".into(),
                to: "new".into()
            }
        );
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(DiffRequest::for_commit("abc")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "show", "ref": "abc"}));
    }
}
