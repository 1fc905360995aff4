//! Transition rows of a machine definition.

use super::action::Action;
use super::guard::Guard;
use super::history::HistoryTarget;
use super::state::Model;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a guarded target leads: a control state or a history pseudo-state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    State(String),
    History(HistoryTarget),
}

impl Target {
    /// The state named by this target; for history targets, the compound
    /// state whose history is referenced.
    pub fn state_name(&self) -> &str {
        match self {
            Target::State(name) => name,
            Target::History(history) => &history.state,
        }
    }

    pub fn is_history(&self) -> bool {
        matches!(self, Target::History(_))
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::State(name.to_string())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::State(name)
    }
}

impl From<HistoryTarget> for Target {
    fn from(history: HistoryTarget) -> Self {
        Target::History(history)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::State(name) => f.write_str(name),
            Target::History(history) => history.fmt(f),
        }
    }
}

/// One `(predicate?, to, action)` entry of a transition row.
///
/// An absent predicate always holds.
pub struct GuardedTarget<M: Model> {
    pub predicate: Option<Guard<M>>,
    pub to: Target,
    pub action: Action<M>,
}

impl<M: Model> GuardedTarget<M> {
    pub fn always(to: impl Into<Target>, action: Action<M>) -> Self {
        Self {
            predicate: None,
            to: to.into(),
            action,
        }
    }

    pub fn when(predicate: Guard<M>, to: impl Into<Target>, action: Action<M>) -> Self {
        Self {
            predicate: Some(predicate),
            to: to.into(),
            action,
        }
    }
}

impl<M: Model> Clone for GuardedTarget<M> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            to: self.to.clone(),
            action: self.action.clone(),
        }
    }
}

impl<M: Model> fmt::Debug for GuardedTarget<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedTarget")
            .field("predicate", &self.predicate)
            .field("to", &self.to)
            .field("action", &self.action)
            .finish()
    }
}

/// A transition row: `from --event--> [guarded targets]`.
///
/// `event: None` marks an eventless (automatic) transition, taken as soon as
/// its origin is entered.
pub struct Transition<M: Model> {
    pub from: String,
    pub event: Option<String>,
    pub guards: Vec<GuardedTarget<M>>,
}

impl<M: Model> Transition<M> {
    /// Unconditional transition on `event`.
    pub fn new(
        from: impl Into<String>,
        event: impl Into<String>,
        to: impl Into<Target>,
        action: Action<M>,
    ) -> Self {
        Self {
            from: from.into(),
            event: Some(event.into()),
            guards: vec![GuardedTarget::always(to, action)],
        }
    }

    /// Transition on `event` choosing among ordered guarded targets.
    pub fn guarded(
        from: impl Into<String>,
        event: impl Into<String>,
        guards: Vec<GuardedTarget<M>>,
    ) -> Self {
        Self {
            from: from.into(),
            event: Some(event.into()),
            guards,
        }
    }

    /// Eventless transition.
    pub fn automatic(from: impl Into<String>, guards: Vec<GuardedTarget<M>>) -> Self {
        Self {
            from: from.into(),
            event: None,
            guards,
        }
    }

    pub fn is_automatic(&self) -> bool {
        self.event.is_none()
    }
}

impl<M: Model> Clone for Transition<M> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            event: self.event.clone(),
            guards: self.guards.clone(),
        }
    }
}

impl<M: Model> fmt::Debug for Transition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("event", &self.event)
            .field("guards", &self.guards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HistoryTarget;

    struct Unit;

    impl Model for Unit {
        type ExtendedState = ();
        type Update = ();
        type EventData = ();
        type Output = ();
    }

    #[test]
    fn unconditional_transition_has_single_unguarded_target() {
        let transition = Transition::<Unit>::new("A", "go", "B", Action::identity());

        assert_eq!(transition.event.as_deref(), Some("go"));
        assert_eq!(transition.guards.len(), 1);
        assert!(transition.guards[0].predicate.is_none());
        assert_eq!(transition.guards[0].to, Target::from("B"));
    }

    #[test]
    fn automatic_transition_has_no_event() {
        let transition =
            Transition::<Unit>::automatic("A", vec![GuardedTarget::always("B", Action::identity())]);
        assert!(transition.is_automatic());
    }

    #[test]
    fn history_target_names_its_compound_state() {
        let target = Target::from(HistoryTarget::shallow("Loaded"));

        assert!(target.is_history());
        assert_eq!(target.state_name(), "Loaded");
        assert_eq!(target.to_string(), "H(Loaded)");
    }

    #[test]
    fn debug_output_names_guards_and_actions() {
        let transition = Transition::<Unit>::guarded(
            "A",
            "go",
            vec![GuardedTarget::when(
                Guard::new("ready", |_, _, _| true),
                "B",
                Action::new("announce", |_, _, _| crate::core::ActionResult::none()),
            )],
        );

        let debug = format!("{transition:?}");
        assert!(debug.contains("ready"));
        assert!(debug.contains("announce"));
    }
}
