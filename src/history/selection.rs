/// Number of commits that make up a squash range.
pub const MAX_SELECTED: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Raised when the second commit is checked. Hashes are in the order they
    /// were checked, not in history order.
    PairSelected(String, String),
}

/// Two-slot set of checked commit hashes.
///
/// The panel and the session each keep one of these and replay the same
/// check/uncheck calls, so both sides agree on which pair was picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    checked: Vec<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `hash` unless it is already checked or two commits are already checked.
    ///
    /// A third check is ignored without any error.
    pub fn check(&mut self, hash: &str) -> Option<SelectionEvent> {
        if self.checked.len() >= MAX_SELECTED || self.is_checked(hash) {
            return None;
        }
        self.checked.push(hash.to_string());

        if self.checked.len() == MAX_SELECTED {
            Some(SelectionEvent::PairSelected(
                self.checked[0].clone(),
                self.checked[1].clone(),
            ))
        } else {
            None
        }
    }

    pub fn uncheck(&mut self, hash: &str) {
        self.checked.retain(|h| h != hash);
    }

    pub fn is_checked(&self, hash: &str) -> bool {
        self.checked.iter().any(|h| h == hash)
    }

    pub fn checked(&self) -> &[String] {
        &self.checked
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pair_selected_in_insertion_order() {
        let mut state = SelectionState::new();
        assert_eq!(state.check("h3"), None);
        assert_eq!(
            state.check("h1"),
            Some(SelectionEvent::PairSelected("h3".into(), "h1".into()))
        );
    }

    #[test]
    fn test_third_check_is_ignored() {
        let mut state = SelectionState::new();
        state.check("a");
        state.check("b");
        assert_eq!(state.check("c"), None);
        assert_eq!(state.checked(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_duplicate_check_is_noop() {
        let mut state = SelectionState::new();
        state.check("a");
        assert_eq!(state.check("a"), None);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_uncheck_unknown_hash_is_noop() {
        let mut state = SelectionState::new();
        state.check("a");
        state.uncheck("zzz");
        assert!(state.is_checked("a"));
    }

    #[test]
    fn test_pair_fires_once_per_cycle() {
        let mut state = SelectionState::new();
        let mut fired = 0;
        let script = [
            ("check", "a"),
            ("check", "b"),
            ("check", "c"),
            ("check", "b"),
            ("uncheck", "b"),
            ("check", "c"),
            ("uncheck", "a"),
            ("uncheck", "c"),
            ("check", "d"),
            ("check", "e"),
        ];

        for (op, hash) in script {
            match op {
                "check" => {
                    if state.check(hash).is_some() {
                        fired += 1;
                    }
                }
                _ => state.uncheck(hash),
            }
            assert!(state.len() <= MAX_SELECTED);
        }
        assert_eq!(fired, 3);
    }
}
