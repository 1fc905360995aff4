//! Inputs available to every contract.

use crate::config::Settings;
use crate::core::StateNode;
use crate::indices::Indices;

/// The raw definition, the settings, and the indices built from them.
#[derive(Clone, Copy, Debug)]
pub struct ContractContext<'a> {
    pub states: &'a [StateNode],
    pub events: &'a [String],
    pub initial_control_state: Option<&'a str>,
    /// Root init transitions supplied by the caller, before any is
    /// synthesized from `initial_control_state`.
    pub explicit_initial_transitions: usize,
    pub settings: &'a Settings,
    pub indices: &'a Indices,
}
