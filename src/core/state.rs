//! Control states and the type bundle a machine is parameterized over.
//!
//! Control states form a tree of named nodes. Compound states own an ordered
//! list of children, atomic states own none. The extended state, reducer
//! updates, event data and outputs are supplied by the caller through the
//! [`Model`] trait.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Name of the virtual root state that wraps the declared hierarchy.
///
/// The machine sits in this state until its initial transition has run. It
/// can never be declared, targeted, or re-entered.
pub const INIT_STATE: &str = "nok";

/// Event taken on entering the machine or a compound state.
pub const INIT_EVENT: &str = "init";

/// Table key under which eventless transitions are registered.
pub(crate) const AUTO_EVENT: &str = "";

/// Types a machine is parameterized over.
///
/// A `Model` is usually a zero-sized marker type:
///
/// ```rust
/// use hfsm::core::Model;
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Counter {
///     count: u32,
/// }
///
/// struct CounterModel;
///
/// impl Model for CounterModel {
///     type ExtendedState = Counter;
///     type Update = u32;
///     type EventData = ();
///     type Output = String;
/// }
/// ```
pub trait Model: Sized + 'static {
    /// Extended (model) state owned by one machine instance.
    type ExtendedState: Clone + Debug + 'static;

    /// Update consumed by the reducer to produce the next extended state.
    type Update: Clone + Debug + 'static;

    /// Payload carried by events.
    ///
    /// The machine's own init event carries `Default::default()`.
    type EventData: Clone + Debug + Default + 'static;

    /// Value handed back to the caller by actions.
    type Output: Clone + Debug + 'static;
}

/// A node of the control state hierarchy.
///
/// # Example
///
/// ```rust
/// use hfsm::core::StateNode;
///
/// let loaded = StateNode::compound(
///     "Loaded",
///     vec![StateNode::atomic("Stopped"), StateNode::atomic("Playing")],
/// );
///
/// assert!(loaded.is_compound());
/// assert_eq!(loaded.children().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StateNode>,
}

impl StateNode {
    /// Create a leaf state.
    pub fn atomic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create a state with children.
    pub fn compound(name: impl Into<String>, children: Vec<StateNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[StateNode] {
        &self.children
    }

    /// A state is compound iff it has at least one child.
    pub fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }

    /// Wrap the declared top-level states under the virtual root.
    pub(crate) fn root(states: &[StateNode]) -> Self {
        Self::compound(INIT_STATE, states.to_vec())
    }
}
