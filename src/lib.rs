//! Hfsm: a hierarchical finite state machine runtime
//!
//! A machine is declared as nested control states, events, and transitions
//! with ordered guards, over a typed extended state. The declaration is
//! compiled into immutable lookup indices, checked against a battery of
//! structural contracts, and then executed by a deterministic, synchronous
//! dispatcher that resolves compound states, eventless transitions, and
//! shallow and deep history.
//!
//! # Core Concepts
//!
//! - **Model**: the types of extended state, updates, event data and outputs
//! - **Actions**: pure functions returning updates for the reducer and outputs
//! - **Guards**: named predicates tried in declaration order
//! - **History**: `H(state)` and `H*(state)` targets re-entering a compound state
//!   where it was left
//!
//! # Example
//!
//! ```rust
//! use hfsm::builder::{MachineBuilder, TransitionBuilder};
//! use hfsm::core::{Action, ActionResult, Guard, HistoryTarget, Model};
//! use hfsm::engine::Event;
//! use hfsm::states;
//!
//! struct CdPlayer;
//!
//! impl Model for CdPlayer {
//!     type ExtendedState = u32;
//!     type Update = u32;
//!     type EventData = ();
//!     type Output = String;
//! }
//!
//! let mut player = MachineBuilder::<CdPlayer>::new()
//!     .states(states! { Empty, Loaded => { Stopped, Playing } })
//!     .events(["insert", "play", "next_track", "eject"])
//!     .initial_control_state("Empty")
//!     .initial_extended_state(1)
//!     .update_state(|track, updates| updates.iter().fold(*track, |t, step| t + step))
//!     .transition(TransitionBuilder::<CdPlayer>::new().from("Empty").on("insert").to("Loaded"))?
//!     .transition(TransitionBuilder::<CdPlayer>::new().from("Loaded").on("init").to("Stopped"))?
//!     .transition(TransitionBuilder::<CdPlayer>::new().from("Stopped").on("play").to("Playing"))?
//!     .transition(TransitionBuilder::<CdPlayer>::new().from("Loaded").on("eject").to("Empty"))?
//!     .transition(
//!         TransitionBuilder::<CdPlayer>::new()
//!             .from("Playing")
//!             .on("next_track")
//!             .when(
//!                 Guard::new("is_last_track", |track, _, _| *track >= 10),
//!                 "Stopped",
//!                 Action::identity(),
//!             )
//!             .when(
//!                 Guard::new("is_not_last_track", |track, _, _| *track < 10),
//!                 HistoryTarget::shallow("Loaded"),
//!                 Action::new("skip", |track, _, _| {
//!                     ActionResult::updates(vec![1]).with_outputs(vec![format!("track {}", track + 1)])
//!                 }),
//!             ),
//!     )?
//!     .build()?;
//!
//! player.dispatch(Event::named("insert"))?;
//! player.dispatch(Event::named("play"))?;
//! let outcome = player.dispatch(Event::named("next_track"))?;
//!
//! assert_eq!(player.current_state(), "Playing");
//! assert_eq!(outcome.into_outputs(), Some(vec!["track 2".to_string()]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod config;
pub mod contracts;
pub mod core;
pub mod engine;
pub mod indices;
pub mod trace;
pub mod traversal;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use crate::config::Settings;
pub use crate::core::{
    Action, ActionResult, Guard, HistoryTarget, Model, StateNode, Target, Transition,
};
pub use crate::engine::{DispatchError, DispatchOutcome, Event, Machine, MachineDefinition};
