//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::config::Settings;
use crate::core::{Action, CallbackError, Model, Reducer, StateNode, Target, Transition};
use crate::engine::{Machine, MachineDefinition};
use std::sync::Arc;

/// Builder for constructing machines with a fluent API.
pub struct MachineBuilder<M: Model> {
    states: Vec<StateNode>,
    events: Vec<String>,
    transitions: Vec<Transition<M>>,
    initial_control_state: Option<String>,
    initial_extended_state: Option<M::ExtendedState>,
    update_state: Option<Reducer<M>>,
    entry_actions: Vec<(String, Action<M>)>,
    settings: Settings,
}

impl<M: Model> MachineBuilder<M> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            events: Vec::new(),
            transitions: Vec::new(),
            initial_control_state: None,
            initial_extended_state: None,
            update_state: None,
            entry_actions: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// Declare top-level states (and everything nested below them).
    pub fn states(mut self, states: Vec<StateNode>) -> Self {
        self.states.extend(states);
        self
    }

    /// Declare events.
    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events.extend(events.into_iter().map(Into::into));
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<M>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<M>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<M>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Enter `state` when the machine starts. Alternative to an explicit
    /// init transition from the root.
    pub fn initial_control_state(mut self, state: impl Into<String>) -> Self {
        self.initial_control_state = Some(state.into());
        self
    }

    /// Set the initial extended state (required).
    pub fn initial_extended_state(mut self, state: M::ExtendedState) -> Self {
        self.initial_extended_state = Some(state);
        self
    }

    /// Set the reducer from an infallible function (required).
    pub fn update_state<F>(self, reducer: F) -> Self
    where
        F: Fn(&M::ExtendedState, &[M::Update]) -> M::ExtendedState + Send + Sync + 'static,
    {
        self.try_update_state(move |state, updates| Ok(reducer(state, updates)))
    }

    /// Set the reducer from a function that may fail.
    pub fn try_update_state<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&M::ExtendedState, &[M::Update]) -> Result<M::ExtendedState, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        self.update_state = Some(Arc::new(reducer));
        self
    }

    /// Run `action` every time `state` is entered through a transition
    /// naming it as a plain target.
    ///
    /// The entry action sees the extended state already updated by the
    /// transition's own action; its updates and outputs follow those of the
    /// transition's action. Targets given as history states, and the
    /// transition synthesized from `initial_control_state`, are not decorated.
    pub fn entry_action(mut self, state: impl Into<String>, action: Action<M>) -> Self {
        self.entry_actions.push((state.into(), action));
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Assemble the definition without starting a machine.
    pub fn definition(self) -> Result<MachineDefinition<M>, BuildError> {
        self.into_parts().map(|(definition, _)| definition)
    }

    /// Build and start the machine.
    pub fn build(self) -> Result<Machine<M>, BuildError> {
        let (definition, settings) = self.into_parts()?;
        Machine::create(definition, settings)
    }

    fn into_parts(self) -> Result<(MachineDefinition<M>, Settings), BuildError> {
        let initial_extended_state = self
            .initial_extended_state
            .ok_or(BuildError::MissingExtendedState)?;
        let update_state = self.update_state.ok_or(BuildError::MissingReducer)?;

        let mut transitions = self.transitions;
        for (state, entry) in &self.entry_actions {
            if !declares(&self.states, state) {
                return Err(BuildError::UnknownEntryState {
                    state: state.clone(),
                });
            }
            decorate_entry(&mut transitions, state, entry, &update_state);
        }

        let definition = MachineDefinition {
            states: self.states,
            events: self.events,
            transitions,
            initial_extended_state,
            initial_control_state: self.initial_control_state,
            update_state,
        };
        Ok((definition, self.settings))
    }
}

impl<M: Model> Default for MachineBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

fn declares(states: &[StateNode], name: &str) -> bool {
    states
        .iter()
        .any(|node| node.name == name || declares(&node.children, name))
}

fn decorate_entry<M: Model>(
    transitions: &mut [Transition<M>],
    state: &str,
    entry: &Action<M>,
    reducer: &Reducer<M>,
) {
    let targets = transitions
        .iter_mut()
        .flat_map(|transition| transition.guards.iter_mut())
        .filter(|guarded| matches!(&guarded.to, Target::State(to) if to == state));

    for guarded in targets {
        guarded.action = guarded
            .action
            .clone()
            .then(entry.clone(), Arc::clone(reducer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ActionResult, HistoryTarget, INIT_EVENT, INIT_STATE};
    use crate::engine::Event;
    use crate::states;

    #[derive(Debug)]
    struct Player;

    impl Model for Player {
        type ExtendedState = u32;
        type Update = u32;
        type EventData = ();
        type Output = String;
    }

    fn announce(name: &str, text: &str) -> Action<Player> {
        let text = text.to_string();
        Action::new(name, move |_, _, _| ActionResult::outputs(vec![text.clone()]))
    }

    fn player() -> MachineBuilder<Player> {
        MachineBuilder::<Player>::new()
            .states(states! { Stopped, Playing })
            .events(["play", "stop"])
            .initial_control_state("Stopped")
            .initial_extended_state(0)
            .update_state(|plays, updates| plays + updates.iter().sum::<u32>())
            .add_transition(Transition::new(
                "Stopped",
                "play",
                "Playing",
                Action::new("count_play", |_, _, _| ActionResult::updates(vec![1])),
            ))
            .transition(TransitionBuilder::new().from("Playing").on("stop").to("Stopped"))
            .unwrap()
    }

    #[test]
    fn builder_validates_required_fields() {
        let missing_state = MachineBuilder::<Player>::new().build();
        assert!(matches!(missing_state, Err(BuildError::MissingExtendedState)));

        let missing_reducer = MachineBuilder::<Player>::new().initial_extended_state(0).build();
        assert!(matches!(missing_reducer, Err(BuildError::MissingReducer)));
    }

    #[test]
    fn builds_a_settled_machine() {
        let mut machine = player().build().unwrap();
        assert_eq!(machine.current_state(), "Stopped");

        machine.dispatch(Event::named("play")).unwrap();
        machine.dispatch(Event::named("stop")).unwrap();
        machine.dispatch(Event::named("play")).unwrap();

        assert_eq!(machine.current_state(), "Playing");
        assert_eq!(*machine.extended_state(), 2);
    }

    #[test]
    fn definition_can_be_reused() {
        let definition = player().definition().unwrap();

        let first = Machine::create(definition.clone(), Settings::default()).unwrap();
        let second = Machine::create(definition, Settings::default()).unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.current_state(), second.current_state());
    }

    #[test]
    fn contract_failures_surface_as_build_errors() {
        let result = player().events(["rewind"]).build();

        match result {
            Err(BuildError::Contracts(error)) => assert!(error.violates("events_match_transitions")),
            other => panic!("expected contract violations, got {other:?}"),
        }
    }

    #[test]
    fn entry_action_runs_after_transition_action() {
        let mut machine = player()
            .entry_action(
                "Playing",
                Action::new("show_count", |plays, _, _| {
                    ActionResult::outputs(vec![format!("play #{plays}")])
                }),
            )
            .build()
            .unwrap();

        let outcome = machine.dispatch(Event::named("play")).unwrap();
        assert_eq!(outcome.into_outputs(), Some(vec!["play #1".to_string()]));
        assert_eq!(*machine.extended_state(), 1);
    }

    #[test]
    fn entry_action_decorates_explicit_initial_transition() {
        let mut machine = MachineBuilder::<Player>::new()
            .states(states! { Idle, Busy })
            .events(["work", "rest"])
            .initial_extended_state(0)
            .update_state(|count, updates| count + updates.iter().sum::<u32>())
            .add_transition(Transition::new(INIT_STATE, INIT_EVENT, "Idle", announce("boot", "booted")))
            .add_transition(Transition::new("Idle", "work", "Busy", Action::identity()))
            .add_transition(Transition::new("Busy", "rest", "Idle", announce("stop", "stopping")))
            .entry_action("Idle", announce("enter_idle", "idle"))
            .build()
            .unwrap();

        assert_eq!(machine.initial_outputs(), ["booted".to_string(), "idle".to_string()]);

        machine.dispatch(Event::named("work")).unwrap();
        let outcome = machine.dispatch(Event::named("rest")).unwrap();
        assert_eq!(
            outcome.into_outputs(),
            Some(vec!["stopping".to_string(), "idle".to_string()])
        );
    }

    #[test]
    fn history_targets_are_not_decorated() {
        let mut transitions = vec![
            Transition::<Player>::new("A", "go", "B", Action::identity()),
            Transition::new("A", "back", HistoryTarget::shallow("B"), Action::identity()),
        ];
        let reducer: Reducer<Player> = Arc::new(|state: &u32, _: &[u32]| Ok::<_, CallbackError>(*state));
        decorate_entry(&mut transitions, "B", &announce("enter_b", "b"), &reducer);

        assert_eq!(transitions[0].guards[0].action.name(), "identity+enter_b");
        assert_eq!(transitions[1].guards[0].action.name(), "identity");
    }

    #[test]
    fn entry_action_for_unknown_state_is_rejected() {
        let result = player().entry_action("Rewinding", Action::identity()).build();
        assert!(matches!(result, Err(BuildError::UnknownEntryState { state }) if state == "Rewinding"));
    }
}
