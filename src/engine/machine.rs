//! Machine construction and introspection.

use crate::builder::BuildError;
use crate::config::Settings;
use crate::contracts::{check_contracts, default_contracts, ContractContext};
use crate::core::{
    Action, HistoryStore, Model, Reducer, StateNode, Transition, INIT_EVENT, INIT_STATE,
};
use crate::engine::event::Event;
use crate::indices::Indices;
use crate::trace::{TraceKind, TraceRecord};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Everything needed to create a machine.
///
/// Exactly one of `initial_control_state` and an explicit
/// `INIT_STATE --init--> state` transition must be given.
pub struct MachineDefinition<M: Model> {
    pub states: Vec<StateNode>,
    pub events: Vec<String>,
    pub transitions: Vec<Transition<M>>,
    pub initial_extended_state: M::ExtendedState,
    pub initial_control_state: Option<String>,
    pub update_state: Reducer<M>,
}

impl<M: Model> Clone for MachineDefinition<M> {
    fn clone(&self) -> Self {
        Self {
            states: self.states.clone(),
            events: self.events.clone(),
            transitions: self.transitions.clone(),
            initial_extended_state: self.initial_extended_state.clone(),
            initial_control_state: self.initial_control_state.clone(),
            update_state: Arc::clone(&self.update_state),
        }
    }
}

impl<M: Model> fmt::Debug for MachineDefinition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineDefinition")
            .field("states", &self.states)
            .field("events", &self.events)
            .field("transitions", &self.transitions)
            .field("initial_extended_state", &self.initial_extended_state)
            .field("initial_control_state", &self.initial_control_state)
            .finish_non_exhaustive()
    }
}

/// Mutable part of a machine: everything a dispatch may change.
#[derive(Clone, Debug)]
pub(super) struct Runtime<X> {
    pub control_state: String,
    pub extended_state: X,
    pub history: HistoryStore,
}

/// A running hierarchical state machine.
///
/// Created already settled: the initial transition and its cascade have run
/// by the time [`Machine::create`] returns.
pub struct Machine<M: Model> {
    pub(super) id: Uuid,
    pub(super) settings: Settings,
    pub(super) transitions: Vec<Transition<M>>,
    pub(super) update_state: Reducer<M>,
    pub(super) indices: Indices,
    pub(super) runtime: Runtime<M::ExtendedState>,
    initial_outputs: Vec<M::Output>,
}

fn is_root_init<M: Model>(transition: &Transition<M>) -> bool {
    transition.from == INIT_STATE && transition.event.as_deref() == Some(INIT_EVENT)
}

impl<M: Model> Machine<M> {
    /// Compile, check and start a machine.
    pub fn create(definition: MachineDefinition<M>, settings: Settings) -> Result<Self, BuildError> {
        let MachineDefinition {
            states,
            events,
            mut transitions,
            initial_extended_state,
            initial_control_state,
            update_state,
        } = definition;

        let explicit_initial_transitions = transitions.iter().filter(|t| is_root_init(t)).count();
        if let Some(initial) = &initial_control_state {
            transitions.push(Transition::new(
                INIT_STATE,
                INIT_EVENT,
                initial.as_str(),
                Action::identity(),
            ));
        }

        let indices = Indices::build(&states, &transitions);
        if settings.debug.check_contracts {
            let ctx = ContractContext {
                states: &states,
                events: &events,
                initial_control_state: initial_control_state.as_deref(),
                explicit_initial_transitions,
                settings: &settings,
                indices: &indices,
            };
            check_contracts(&ctx, &default_contracts())?;
        }
        if indices.initial_rows.is_empty() {
            return Err(BuildError::MissingInitialTransition);
        }

        let mut machine = Self {
            id: Uuid::new_v4(),
            settings,
            transitions,
            update_state,
            indices,
            runtime: Runtime {
                control_state: INIT_STATE.to_string(),
                extended_state: initial_extended_state,
                history: HistoryStore::new(),
            },
            initial_outputs: Vec::new(),
        };

        let declared = machine.indices.declared_count();
        let flattened = machine.indices.transitions.len();
        machine.emit(TraceKind::MachineCreated {
            states: declared,
            transitions: flattened,
        });
        tracing::info!(
            machine_id = %machine.id,
            states = declared,
            transitions = flattened,
            "Machine created"
        );

        let outcome = machine
            .dispatch(Event::named(INIT_EVENT))
            .map_err(BuildError::Initialization)?;
        machine.initial_outputs = outcome.into_outputs().unwrap_or_default();

        Ok(machine)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current control state, always a declared state once created.
    pub fn current_state(&self) -> &str {
        &self.runtime.control_state
    }

    pub fn extended_state(&self) -> &M::ExtendedState {
        &self.runtime.extended_state
    }

    pub fn history(&self) -> &HistoryStore {
        &self.runtime.history
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Outputs produced while the machine settled at creation.
    pub fn initial_outputs(&self) -> &[M::Output] {
        &self.initial_outputs
    }

    /// Whether `state` is the current control state or one of its ancestors.
    pub fn is_in(&self, state: &str) -> bool {
        self.indices
            .lineage(&self.runtime.control_state)
            .any(|ancestor| ancestor == state)
    }

    pub(super) fn emit(&self, kind: TraceKind) {
        if let Some(tracer) = &self.settings.debug.tracer {
            tracer.trace(&TraceRecord::now(self.id, kind));
        }
    }
}

impl<M: Model> fmt::Debug for Machine<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("control_state", &self.runtime.control_state)
            .field("extended_state", &self.runtime.extended_state)
            .field("history", &self.runtime.history)
            .finish_non_exhaustive()
    }
}
