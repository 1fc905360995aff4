//! Core types of a hierarchical machine definition.
//!
//! This module contains the data model shared by every other module:
//! - Control states via [`StateNode`] and the [`Model`] type bundle
//! - Named guards and actions
//! - Transition rows and their targets
//! - History pseudo-states and the immutable [`HistoryStore`]
//!
//! Nothing in this module performs dispatch; it only describes machines.

mod action;
mod guard;
mod history;
mod state;
mod transition;

pub use action::{merge_outputs, Action, ActionResult, ModelActionResult, Reducer};
pub use guard::{CallbackError, Guard};
pub use history::{HistoryMode, HistoryStore, HistoryTarget};
pub use state::{Model, StateNode, INIT_EVENT, INIT_STATE};
pub use transition::{GuardedTarget, Target, Transition};

pub(crate) use state::AUTO_EVENT;
