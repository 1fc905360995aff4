//! Build errors for machine and transition builders.

use crate::contracts::ContractError;
use crate::engine::DispatchError;
use thiserror::Error;

/// Errors that can occur when building machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial extended state not specified. Call .initial_extended_state(state) before .build()")]
    MissingExtendedState,

    #[error("Reducer not specified. Call .update_state(reducer) before .build()")]
    MissingReducer,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition event not specified. Call .on(event) or .automatic()")]
    MissingEvent,

    #[error("Transition target not specified. Call .to(target) or .when(guard, target, action)")]
    MissingTarget,

    #[error("Transition from '{from}' mixes .to()/.action() with guarded .when() targets")]
    MixedGuardForms { from: String },

    #[error("Entry action declared for unknown state '{state}'")]
    UnknownEntryState { state: String },

    #[error("No initial transition. Call .initial_control_state(state) or add a transition from the root on init")]
    MissingInitialTransition,

    #[error(transparent)]
    Contracts(#[from] ContractError),

    #[error("Machine failed to settle in its initial state: {0}")]
    Initialization(#[source] DispatchError),
}
