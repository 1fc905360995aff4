//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Guard, GuardedTarget, Model, Target, Transition};

/// Builder for constructing transitions with a fluent API.
///
/// A transition either has one unconditional target (`.to()`, optionally
/// with `.action()`), or an ordered list of guarded targets (`.when()`),
/// each carrying its own action. Combining the two forms fails to build.
pub struct TransitionBuilder<M: Model> {
    from: Option<String>,
    event: Option<Option<String>>,
    to: Option<Target>,
    action: Option<Action<M>>,
    guards: Vec<GuardedTarget<M>>,
}

impl<M: Model> TransitionBuilder<M> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            event: None,
            to: None,
            action: None,
            guards: Vec::new(),
        }
    }

    /// Set the origin state (required).
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from = Some(state.into());
        self
    }

    /// Trigger on a named event.
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.event = Some(Some(event.into()));
        self
    }

    /// Trigger without an event, as soon as the origin is entered.
    pub fn automatic(mut self) -> Self {
        self.event = Some(None);
        self
    }

    /// Set the unconditional target.
    pub fn to(mut self, target: impl Into<Target>) -> Self {
        self.to = Some(target.into());
        self
    }

    /// Action of the unconditional target. Defaults to [`Action::identity`].
    pub fn action(mut self, action: Action<M>) -> Self {
        self.action = Some(action);
        self
    }

    /// Append a guarded target. Guards are tried in the order they are added.
    pub fn when(mut self, guard: Guard<M>, target: impl Into<Target>, action: Action<M>) -> Self {
        self.guards.push(GuardedTarget::when(guard, target, action));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<M>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;

        if self.action.is_some() && !self.guards.is_empty() {
            return Err(BuildError::MixedGuardForms { from });
        }

        let guards = match (self.to, self.guards.is_empty()) {
            (Some(_), false) => return Err(BuildError::MixedGuardForms { from }),
            (Some(to), true) => vec![GuardedTarget::always(
                to,
                self.action.unwrap_or_else(Action::identity),
            )],
            (None, false) => self.guards,
            (None, true) => return Err(BuildError::MissingTarget),
        };

        Ok(Transition {
            from,
            event,
            guards,
        })
    }
}

impl<M: Model> Default for TransitionBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}
