//! Actions computed when a guarded target is taken.
//!
//! Actions never mutate the extended state. They describe the change as a list
//! of updates for the reducer and hand outputs back to the caller.

use super::guard::CallbackError;
use super::state::Model;
use crate::config::Settings;
use std::fmt;
use std::sync::Arc;

/// What an action produced: updates for the reducer and outputs for the caller.
///
/// `outputs: None` is the absent-output marker; it is skipped when outputs
/// are aggregated, whereas `Some(vec![])` is an explicit empty list.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionResult<U, O> {
    pub updates: Vec<U>,
    pub outputs: Option<Vec<O>>,
}

impl<U, O> ActionResult<U, O> {
    /// No updates and no output.
    pub fn none() -> Self {
        Self {
            updates: Vec::new(),
            outputs: None,
        }
    }

    /// Updates only.
    pub fn updates(updates: Vec<U>) -> Self {
        Self {
            updates,
            outputs: None,
        }
    }

    /// Outputs only.
    pub fn outputs(outputs: Vec<O>) -> Self {
        Self {
            updates: Vec::new(),
            outputs: Some(outputs),
        }
    }

    pub fn with_outputs(mut self, outputs: Vec<O>) -> Self {
        self.outputs = Some(outputs);
        self
    }
}

/// Result type produced by actions of a given model.
pub type ModelActionResult<M> = ActionResult<<M as Model>::Update, <M as Model>::Output>;

type ActionFactory<M> = Arc<
    dyn Fn(
            &<M as Model>::ExtendedState,
            &<M as Model>::EventData,
            &Settings,
        ) -> Result<ModelActionResult<M>, CallbackError>
        + Send
        + Sync,
>;

/// Reducer folding a list of updates into the extended state.
pub type Reducer<M> = Arc<
    dyn Fn(
            &<M as Model>::ExtendedState,
            &[<M as Model>::Update],
        ) -> Result<<M as Model>::ExtendedState, CallbackError>
        + Send
        + Sync,
>;

/// Named action factory.
pub struct Action<M: Model> {
    name: String,
    factory: ActionFactory<M>,
}

impl<M: Model> Action<M> {
    /// Create an action from an infallible function.
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&M::ExtendedState, &M::EventData, &Settings) -> ModelActionResult<M>
            + Send
            + Sync
            + 'static,
    {
        Self::try_new(name, move |state, data, settings| {
            Ok(factory(state, data, settings))
        })
    }

    /// Create an action from a function that may fail.
    pub fn try_new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(
                &M::ExtendedState,
                &M::EventData,
                &Settings,
            ) -> Result<ModelActionResult<M>, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        Action {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    /// The action that changes nothing and outputs nothing.
    pub fn identity() -> Self {
        Self::new("identity", |_, _, _| ActionResult::none())
    }

    /// An action that only emits the given outputs.
    pub fn emit(name: impl Into<String>, outputs: Vec<M::Output>) -> Self
    where
        M::Output: Send + Sync,
    {
        Self::new(name, move |_, _, _| ActionResult::outputs(outputs.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(
        &self,
        state: &M::ExtendedState,
        data: &M::EventData,
        settings: &Settings,
    ) -> Result<ModelActionResult<M>, CallbackError> {
        (self.factory)(state, data, settings)
    }

    /// Run `self`, fold its updates with `reducer`, then run `next` on the
    /// resulting extended state.
    ///
    /// Updates are concatenated in call order. Outputs are merged the same
    /// way, and the result is absent only when both sides are absent.
    pub fn then(self, next: Action<M>, reducer: Reducer<M>) -> Action<M> {
        let name = format!("{}+{}", self.name, next.name);
        Action::try_new(name, move |state, data, settings| {
            let first = self.run(state, data, settings)?;
            let intermediate = reducer(state, &first.updates)?;
            let second = next.run(&intermediate, data, settings)?;

            let mut updates = first.updates;
            updates.extend(second.updates);

            Ok(ActionResult {
                updates,
                outputs: merge_outputs(first.outputs, second.outputs),
            })
        })
    }
}

/// Concatenate two optional output lists, skipping absent ones.
pub fn merge_outputs<O>(first: Option<Vec<O>>, second: Option<Vec<O>>) -> Option<Vec<O>> {
    match (first, second) {
        (None, None) => None,
        (Some(outputs), None) | (None, Some(outputs)) => Some(outputs),
        (Some(mut outputs), Some(more)) => {
            outputs.extend(more);
            Some(outputs)
        }
    }
}

impl<M: Model> Clone for Action<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<M: Model> fmt::Debug for Action<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}
