//! Guard predicates for selecting among the targets of a transition.
//!
//! A guard inspects the extended state, the event data and the settings and
//! decides whether its target is taken. Guards are tried in declaration order;
//! the first one that holds wins.

use super::state::Model;
use crate::config::Settings;
use std::fmt;
use std::sync::Arc;

/// Error produced by a user-supplied guard, action or reducer.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

type Predicate<M> = Arc<
    dyn Fn(
            &<M as Model>::ExtendedState,
            &<M as Model>::EventData,
            &Settings,
        ) -> Result<bool, CallbackError>
        + Send
        + Sync,
>;

/// Named predicate that decides whether a guarded target is taken.
///
/// The name shows up in logs, traces and error diagnostics.
///
/// # Example
///
/// ```rust
/// use hfsm::config::Settings;
/// use hfsm::core::{Guard, Model};
///
/// struct Tracks;
///
/// impl Model for Tracks {
///     type ExtendedState = u32;
///     type Update = u32;
///     type EventData = ();
///     type Output = ();
/// }
///
/// let is_last_track = Guard::<Tracks>::new("is_last_track", |track, _, _| *track == 3);
///
/// assert!(is_last_track.check(&3, &(), &Settings::default()).unwrap());
/// assert!(!is_last_track.check(&1, &(), &Settings::default()).unwrap());
/// ```
pub struct Guard<M: Model> {
    name: String,
    predicate: Predicate<M>,
}

impl<M: Model> Guard<M> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&M::ExtendedState, &M::EventData, &Settings) -> bool + Send + Sync + 'static,
    {
        Self::try_new(name, move |state, data, settings| {
            Ok(predicate(state, data, settings))
        })
    }

    /// Create a guard from a predicate that may fail.
    ///
    /// A failing predicate aborts the dispatch with a diagnostic error.
    pub fn try_new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&M::ExtendedState, &M::EventData, &Settings) -> Result<bool, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        Guard {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the predicate.
    pub fn check(
        &self,
        state: &M::ExtendedState,
        data: &M::EventData,
        settings: &Settings,
    ) -> Result<bool, CallbackError> {
        (self.predicate)(state, data, settings)
    }
}

impl<M: Model> Clone for Guard<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<M: Model> fmt::Debug for Guard<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guard").field(&self.name).finish()
    }
}
