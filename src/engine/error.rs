//! Dispatch results: recoverable outcomes and fatal errors.

use crate::core::CallbackError;
use thiserror::Error;

/// What happened to one external event.
///
/// `Unhandled` and `NoGuardSatisfied` are not failures: the machine is left
/// exactly as it was and there is nothing to output.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome<O> {
    /// At least one transition was taken. Outputs of the outer action come
    /// first, followed by those of every cascaded transition.
    Transitioned(Vec<O>),

    /// No state on the ancestor chain handles the event.
    Unhandled { state: String, event: String },

    /// A handler matched but none of its guards held.
    NoGuardSatisfied { state: String, event: String },
}

impl<O> DispatchOutcome<O> {
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned(_))
    }

    /// Outputs of a taken transition, `None` when nothing happened.
    pub fn outputs(&self) -> Option<&[O]> {
        match self {
            Self::Transitioned(outputs) => Some(outputs),
            _ => None,
        }
    }

    pub fn into_outputs(self) -> Option<Vec<O>> {
        match self {
            Self::Transitioned(outputs) => Some(outputs),
            _ => None,
        }
    }
}

/// Fatal dispatch failures. The machine is rolled back to its state before
/// the event when one of these is returned.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Malformed event: {reason}")]
    MalformedEvent { reason: String },

    #[error("Guard '{guard}' failed in state '{state}' on event '{event}' (extended state: {extended_state}, event data: {event_data}): {source}")]
    GuardFailed {
        guard: String,
        state: String,
        event: String,
        extended_state: String,
        event_data: String,
        #[source]
        source: CallbackError,
    },

    #[error("Action '{action}' failed in state '{state}' on event '{event}' (extended state: {extended_state}, event data: {event_data}): {source}")]
    ActionFailed {
        action: String,
        state: String,
        event: String,
        extended_state: String,
        event_data: String,
        #[source]
        source: CallbackError,
    },

    #[error("Reducer failed on updates of action '{action}' in state '{state}' on event '{event}' (extended state: {extended_state}, updates: {updates}): {source}")]
    ReducerFailed {
        action: String,
        state: String,
        event: String,
        extended_state: String,
        updates: String,
        #[source]
        source: CallbackError,
    },

    #[error("Transition from '{state}' on event '{event}' resolved to unknown state '{target}'")]
    UnknownTarget {
        state: String,
        event: String,
        target: String,
    },

    #[error("More than {limit} chained transitions after entering '{state}'")]
    CascadeLimitExceeded { state: String, limit: usize },
}

impl DispatchError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            reason: reason.into(),
        }
    }
}
