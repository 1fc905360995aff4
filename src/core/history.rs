//! History pseudo-states and the per-instance record backing them.
//!
//! A history target names a compound state and a mode. Shallow history
//! re-enters the direct child of that state that was last active, deep
//! history re-enters the exact leaf. The [`HistoryStore`] is updated each
//! time a state is exited and is immutable: recording returns a new store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which descendant a history target re-enters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    Shallow,
    Deep,
}

/// Reference to the history pseudo-state of a compound state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryTarget {
    pub mode: HistoryMode,
    pub state: String,
}

impl HistoryTarget {
    pub fn shallow(state: impl Into<String>) -> Self {
        Self {
            mode: HistoryMode::Shallow,
            state: state.into(),
        }
    }

    pub fn deep(state: impl Into<String>) -> Self {
        Self {
            mode: HistoryMode::Deep,
            state: state.into(),
        }
    }
}

impl fmt::Display for HistoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            HistoryMode::Shallow => write!(f, "H({})", self.state),
            HistoryMode::Deep => write!(f, "H*({})", self.state),
        }
    }
}

/// Last visited descendants, per compound state.
///
/// # Example
///
/// ```rust
/// use hfsm::core::{HistoryStore, HistoryTarget};
///
/// // Leaving leaf X nested as C > D > X
/// let ancestors = vec!["D".to_string(), "C".to_string()];
/// let history = HistoryStore::new().record_exit("X", &ancestors);
///
/// assert_eq!(history.resolve(&HistoryTarget::shallow("C")), "D");
/// assert_eq!(history.resolve(&HistoryTarget::deep("C")), "X");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStore {
    shallow: BTreeMap<String, String>,
    deep: BTreeMap<String, String>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `state` was exited, returning the updated store.
    ///
    /// `ancestors` lists the compound ancestors of `state` from its parent
    /// upwards, excluding the virtual root. Each ancestor's shallow entry
    /// becomes the child on the path to `state`; each deep entry becomes
    /// `state` itself.
    pub fn record_exit(&self, state: &str, ancestors: &[String]) -> Self {
        let mut next = self.clone();
        let mut child = state;
        for ancestor in ancestors {
            next.shallow.insert(ancestor.clone(), child.to_string());
            next.deep.insert(ancestor.clone(), state.to_string());
            child = ancestor.as_str();
        }
        next
    }

    /// Resolve a history target to a control state.
    ///
    /// A compound state that was never exited resolves to itself, so it is
    /// entered fresh through its own init transition.
    pub fn resolve<'a>(&'a self, target: &'a HistoryTarget) -> &'a str {
        self.last_visited(target.mode, &target.state)
            .unwrap_or(target.state.as_str())
    }

    pub fn last_visited(&self, mode: HistoryMode, state: &str) -> Option<&str> {
        let entries = match mode {
            HistoryMode::Shallow => &self.shallow,
            HistoryMode::Deep => &self.deep,
        };
        entries.get(state).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.shallow.is_empty() && self.deep.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn new_store_is_empty() {
        let history = HistoryStore::new();
        assert!(history.is_empty());
        assert_eq!(history.last_visited(HistoryMode::Deep, "C"), None);
    }

    #[test]
    fn unvisited_state_resolves_to_itself() {
        let history = HistoryStore::new();
        assert_eq!(history.resolve(&HistoryTarget::shallow("Loaded")), "Loaded");
        assert_eq!(history.resolve(&HistoryTarget::deep("Loaded")), "Loaded");
    }

    #[test]
    fn record_exit_is_immutable() {
        let history = HistoryStore::new();
        let updated = history.record_exit("Playing", &chain(&["Loaded"]));

        assert!(history.is_empty());
        assert_eq!(updated.resolve(&HistoryTarget::shallow("Loaded")), "Playing");
    }

    #[test]
    fn shallow_and_deep_differ_on_nested_exit() {
        let history = HistoryStore::new().record_exit("X", &chain(&["D", "C"]));

        assert_eq!(history.last_visited(HistoryMode::Shallow, "D"), Some("X"));
        assert_eq!(history.last_visited(HistoryMode::Shallow, "C"), Some("D"));
        assert_eq!(history.last_visited(HistoryMode::Deep, "D"), Some("X"));
        assert_eq!(history.last_visited(HistoryMode::Deep, "C"), Some("X"));
    }

    #[test]
    fn later_exit_overwrites_entries() {
        let history = HistoryStore::new()
            .record_exit("X", &chain(&["D", "C"]))
            .record_exit("Y", &chain(&["C"]));

        assert_eq!(history.resolve(&HistoryTarget::shallow("C")), "Y");
        assert_eq!(history.resolve(&HistoryTarget::deep("C")), "Y");
        assert_eq!(history.resolve(&HistoryTarget::deep("D")), "X");
    }

    #[test]
    fn top_level_exit_records_nothing() {
        let history = HistoryStore::new().record_exit("Idle", &[]);
        assert!(history.is_empty());
    }

    #[test]
    fn history_target_displays_mode() {
        assert_eq!(HistoryTarget::shallow("C").to_string(), "H(C)");
        assert_eq!(HistoryTarget::deep("C").to_string(), "H*(C)");
    }

    #[test]
    fn history_target_serializes_mode_in_lowercase() {
        let json = serde_json::to_string(&HistoryTarget::deep("C")).unwrap();
        assert_eq!(json, r#"{"mode":"deep","state":"C"}"#);
    }
}
