//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and a hierarchy macro for declaring
//! machines with minimal boilerplate while keeping every callable typed.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Action, GuardedTarget, Model, Target, Transition};

/// Create an unconditional transition that changes nothing but the state.
///
/// # Example
///
/// ```
/// use hfsm::builder::simple_transition;
/// use hfsm::core::Model;
///
/// struct Light;
/// impl Model for Light {
///     type ExtendedState = ();
///     type Update = ();
///     type EventData = ();
///     type Output = ();
/// }
///
/// let transition = simple_transition::<Light>("Off", "switch", "On");
/// assert_eq!(transition.event.as_deref(), Some("switch"));
/// ```
pub fn simple_transition<M: Model>(
    from: impl Into<String>,
    event: impl Into<String>,
    to: impl Into<Target>,
) -> Transition<M> {
    Transition::new(from, event, to, Action::identity())
}

/// Create an eventless transition taken as soon as `from` is entered.
pub fn automatic_transition<M: Model>(from: impl Into<String>, to: impl Into<Target>) -> Transition<M> {
    Transition::automatic(from, vec![GuardedTarget::always(to, Action::identity())])
}
