//! Runtime of a hierarchical state machine.
//!
//! Each external event goes through three phases:
//!
//! 1. **Lookup**: walk from the current state up to the root and take the
//!    first state that handles the event itself.
//! 2. **Guard and action**: take the first guarded target whose predicate
//!    holds, run its action and fold the updates with the reducer.
//! 3. **Settle**: record history for the state being left, resolve the
//!    target, then keep following init transitions of compound states and
//!    eventless transitions until the machine rests.
//!
//! # Example
//!
//! ```rust
//! use hfsm::core::{Action, ActionResult, Model, StateNode, Transition, INIT_EVENT, INIT_STATE};
//! use hfsm::config::Settings;
//! use hfsm::engine::{DispatchOutcome, Event, Machine, MachineDefinition};
//! use std::sync::Arc;
//!
//! struct Door;
//! impl Model for Door {
//!     type ExtendedState = u32;
//!     type Update = u32;
//!     type EventData = ();
//!     type Output = &'static str;
//! }
//!
//! let definition = MachineDefinition::<Door> {
//!     states: vec![StateNode::atomic("Closed"), StateNode::atomic("Open")],
//!     events: vec!["open".into(), "close".into()],
//!     transitions: vec![
//!         Transition::new(INIT_STATE, INIT_EVENT, "Closed", Action::identity()),
//!         Transition::new(
//!             "Closed",
//!             "open",
//!             "Open",
//!             Action::new("count", |_, _, _| ActionResult::updates(vec![1]).with_outputs(vec!["creak"])),
//!         ),
//!         Transition::new("Open", "close", "Closed", Action::identity()),
//!     ],
//!     initial_extended_state: 0,
//!     initial_control_state: None,
//!     update_state: Arc::new(|opened: &u32, updates: &[u32]| Ok(opened + updates.iter().sum::<u32>())),
//! };
//!
//! let mut door = Machine::create(definition, Settings::default()).unwrap();
//! let outcome = door.dispatch(Event::named("open")).unwrap();
//!
//! assert_eq!(outcome, DispatchOutcome::Transitioned(vec!["creak"]));
//! assert_eq!(door.current_state(), "Open");
//! assert_eq!(*door.extended_state(), 1);
//! ```

mod dispatch;
pub mod error;
pub mod event;
mod machine;

pub use error::{DispatchError, DispatchOutcome};
pub use event::Event;
pub use machine::{Machine, MachineDefinition};
