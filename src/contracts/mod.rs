//! Construction-time contracts over a machine definition.
//!
//! Contracts are checked with stillwater's `Validation` so a broken
//! definition reports every violation in one pass. A contract flagged
//! `should_throw_immediately` stops the run as soon as it fails; the
//! violations collected so far are still reported.
//!
//! # Example
//!
//! ```rust
//! use hfsm::contracts::{check_contracts, default_contracts, ContractContext};
//! use hfsm::config::Settings;
//! use hfsm::core::{Action, Model, StateNode, Transition, INIT_EVENT, INIT_STATE};
//! use hfsm::indices::Indices;
//!
//! struct Toggle;
//! impl Model for Toggle {
//!     type ExtendedState = ();
//!     type Update = ();
//!     type EventData = ();
//!     type Output = ();
//! }
//!
//! let states = vec![StateNode::atomic("Off"), StateNode::atomic("On")];
//! let events = vec!["flip".to_string()];
//! let transitions: Vec<Transition<Toggle>> = vec![
//!     Transition::new(INIT_STATE, INIT_EVENT, "Off", Action::identity()),
//!     Transition::new("Off", "flip", "On", Action::identity()),
//!     Transition::new("On", "flip", "Off", Action::identity()),
//! ];
//! let settings = Settings::default();
//! let indices = Indices::build(&states, &transitions);
//!
//! let ctx = ContractContext {
//!     states: &states,
//!     events: &events,
//!     initial_control_state: None,
//!     explicit_initial_transitions: 1,
//!     settings: &settings,
//!     indices: &indices,
//! };
//! assert!(check_contracts(&ctx, &default_contracts()).is_ok());
//! ```

pub mod context;
mod rules;
pub mod violations;

pub use context::ContractContext;
pub use violations::{ContractError, ContractViolation};

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Signature of a contract check.
pub type ContractCheck = fn(&ContractContext<'_>) -> Validation<(), NonEmptyVec<ContractViolation>>;

/// A named, checkable property of a machine definition.
#[derive(Clone, Copy)]
pub struct Contract {
    pub name: &'static str,
    pub description: &'static str,
    pub should_throw_immediately: bool,
    pub check: ContractCheck,
}

impl Contract {
    pub fn evaluate(&self, ctx: &ContractContext<'_>) -> Validation<(), NonEmptyVec<ContractViolation>> {
        (self.check)(ctx)
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("name", &self.name)
            .field("should_throw_immediately", &self.should_throw_immediately)
            .finish()
    }
}

macro_rules! contract {
    ($check:ident, $description:expr) => {
        Contract {
            name: stringify!($check),
            description: $description,
            should_throw_immediately: false,
            check: rules::$check,
        }
    };
}

/// The built-in battery, in evaluation order.
pub fn default_contracts() -> Vec<Contract> {
    vec![
        contract!(well_formed_definition, "states, transitions and settings have the expected shape"),
        contract!(initial_control_state_declared, "the initial control state, when given, is a declared state"),
        contract!(no_transition_to_root, "no transition targets the root state"),
        contract!(event_names_valid, "event names are non-empty and do not reuse the init event"),
        contract!(transition_shape, "an unconditional target is the only target of its transition"),
        contract!(unique_state_names, "state names are unique across the hierarchy"),
        contract!(root_name_not_reused, "no declared state reuses the root name"),
        contract!(at_least_one_state, "at least one control state is declared"),
        contract!(events_match_transitions, "declared events and events used by transitions agree"),
        contract!(states_match_transitions, "declared states and states referenced by transitions agree"),
        contract!(single_initial_transition, "exactly one way of entering the machine is given"),
        contract!(init_only_from_compound, "init transitions originate only from compound states"),
        contract!(compound_init_valid, "each compound state has one unconditional init into a descendant"),
        contract!(no_mixed_eventless, "a state with an eventless transition has no other transitions"),
        contract!(no_eventless_atomic_self_loop, "no atomic state has an eventless transition to itself"),
        contract!(guards_in_single_row, "all guards for an (origin, event) pair sit in one transition"),
        contract!(no_ancestor_conflicts, "a state and one of its ancestors never handle the same event"),
        contract!(history_targets_valid, "history targets name declared compound states"),
    ]
}

/// Run `contracts` in order, accumulating every violation.
pub fn check_contracts(ctx: &ContractContext<'_>, contracts: &[Contract]) -> Result<(), ContractError> {
    let mut checks: Vec<Validation<(), NonEmptyVec<ContractViolation>>> = Vec::new();

    for contract in contracts {
        let verdict = contract.evaluate(ctx);
        let failed = verdict.is_failure();
        if let Validation::Failure(violations) = &verdict {
            for violation in violations.iter() {
                tracing::error!(
                    contract = contract.name,
                    data = %violation.data,
                    "{}",
                    violation.message
                );
            }
        }
        checks.push(verdict);
        if failed && contract.should_throw_immediately {
            tracing::warn!(contract = contract.name, "stopping contract checks early");
            break;
        }
    }

    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => Err(ContractError {
            violations: violations.iter().cloned().collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::core::{
        Action, Guard, GuardedTarget, HistoryTarget, Model, StateNode, Transition, INIT_EVENT,
        INIT_STATE,
    };
    use crate::indices::Indices;

    struct Unit;

    impl Model for Unit {
        type ExtendedState = ();
        type Update = ();
        type EventData = ();
        type Output = ();
    }

    struct Definition {
        states: Vec<StateNode>,
        events: Vec<String>,
        transitions: Vec<Transition<Unit>>,
        initial_control_state: Option<String>,
        settings: Settings,
    }

    impl Definition {
        fn new(states: Vec<StateNode>, events: &[&str], transitions: Vec<Transition<Unit>>) -> Self {
            Self {
                states,
                events: events.iter().map(|e| e.to_string()).collect(),
                transitions,
                initial_control_state: None,
                settings: Settings::default(),
            }
        }

        fn check_with(&self, contracts: &[Contract]) -> Result<(), ContractError> {
            let explicit = self
                .transitions
                .iter()
                .filter(|t| t.from == INIT_STATE && t.event.as_deref() == Some(INIT_EVENT))
                .count();
            let mut transitions = self.transitions.clone();
            if let Some(initial) = &self.initial_control_state {
                transitions.push(Transition::new(
                    INIT_STATE,
                    INIT_EVENT,
                    initial.as_str(),
                    Action::identity(),
                ));
            }
            let indices = Indices::build(&self.states, &transitions);
            let ctx = ContractContext {
                states: &self.states,
                events: &self.events,
                initial_control_state: self.initial_control_state.as_deref(),
                explicit_initial_transitions: explicit,
                settings: &self.settings,
                indices: &indices,
            };
            check_contracts(&ctx, contracts)
        }

        fn check(&self) -> Result<(), ContractError> {
            self.check_with(&default_contracts())
        }
    }

    fn init(to: &str) -> Transition<Unit> {
        Transition::new(INIT_STATE, INIT_EVENT, to, Action::identity())
    }

    fn go(from: &str, event: &str, to: &str) -> Transition<Unit> {
        Transition::new(from, event, to, Action::identity())
    }

    fn atomic(names: &[&str]) -> Vec<StateNode> {
        names.iter().map(|n| StateNode::atomic(*n)).collect()
    }

    fn violated(definition: &Definition) -> Vec<&'static str> {
        match definition.check() {
            Ok(()) => Vec::new(),
            Err(error) => error.contracts(),
        }
    }

    fn valid() -> Definition {
        Definition::new(
            atomic(&["A", "B"]),
            &["next"],
            vec![init("A"), go("A", "next", "B"), go("B", "next", "A")],
        )
    }

    #[test]
    fn valid_definition_passes() {
        assert!(valid().check().is_ok());
    }

    #[test]
    fn nested_definition_passes() {
        let definition = Definition::new(
            vec![
                StateNode::atomic("Out"),
                StateNode::compound("C", atomic(&["X", "Y"])),
            ],
            &["enter", "leave", "back"],
            vec![
                init("Out"),
                go("Out", "enter", "C"),
                go("C", INIT_EVENT, "X"),
                go("X", "leave", "Out"),
                Transition::new("Y", "back", HistoryTarget::shallow("C"), Action::identity()),
            ],
        );
        assert!(definition.check().is_ok(), "{:?}", definition.check());
    }

    #[test]
    fn all_violations_are_reported_together() {
        let definition = Definition::new(
            atomic(&["A", "A"]),
            &["next", "unused"],
            vec![init("A"), go("A", "next", "Ghost")],
        );
        let error = definition.check().unwrap_err();

        assert!(error.violates("unique_state_names"));
        assert!(error.violates("events_match_transitions"));
        assert!(error.violates("states_match_transitions"));
        assert!(error.violations.len() >= 3);
    }

    #[test]
    fn flagged_contract_stops_the_run() {
        let definition = Definition::new(atomic(&["A", "A"]), &["next", "unused"], vec![init("A")]);
        let mut contracts = default_contracts();
        for contract in &mut contracts {
            if contract.name == "unique_state_names" {
                contract.should_throw_immediately = true;
            }
        }

        let error = definition.check_with(&contracts).unwrap_err();
        assert_eq!(error.contracts(), vec!["unique_state_names"]);
    }

    #[test]
    fn unnamed_states_are_blamed_on_their_parent() {
        let mut definition = valid();
        definition.states = vec![
            StateNode::atomic("A"),
            StateNode::atomic("B"),
            StateNode::compound("C", vec![StateNode::atomic(""), StateNode::atomic("D")]),
        ];

        let error = definition.check().unwrap_err();
        let blame: Vec<_> = error
            .violations
            .iter()
            .filter(|v| v.contract == "well_formed_definition")
            .collect();

        assert_eq!(blame.len(), 1);
        assert_eq!(blame[0].data["parent"], "C");
    }

    #[test]
    fn zero_cascade_depth_is_malformed() {
        let mut definition = valid();
        definition.settings.max_cascade_depth = 0;
        assert_eq!(violated(&definition), vec!["well_formed_definition"]);
    }

    #[test]
    fn undeclared_initial_control_state() {
        let mut definition = Definition::new(
            atomic(&["A", "B"]),
            &["next"],
            vec![go("A", "next", "B"), go("B", "next", "A")],
        );
        definition.initial_control_state = Some("Z".to_string());
        let violated = violated(&definition);

        assert!(violated.contains(&"initial_control_state_declared"));
    }

    #[test]
    fn transition_to_root_is_rejected() {
        let mut definition = valid();
        definition.transitions.push(go("B", "reset", INIT_STATE));
        definition.events.push("reset".to_string());
        assert!(violated(&definition).contains(&"no_transition_to_root"));
    }

    #[test]
    fn reserved_and_empty_event_names() {
        let mut definition = valid();
        definition.events.push(INIT_EVENT.to_string());
        definition.events.push(String::new());
        assert_eq!(violated(&definition), vec!["event_names_valid"]);
    }

    #[test]
    fn unconditional_target_must_stand_alone() {
        let mut definition = valid();
        definition.transitions[2] = Transition::guarded(
            "B",
            "next",
            vec![
                GuardedTarget::when(Guard::new("ready", |_, _, _| true), "A", Action::identity()),
                GuardedTarget::always("B", Action::identity()),
            ],
        );
        assert_eq!(violated(&definition), vec!["transition_shape"]);
    }

    #[test]
    fn empty_guard_list_is_rejected() {
        let mut definition = valid();
        definition.transitions[2] = Transition::guarded("B", "next", Vec::new());
        assert!(violated(&definition).contains(&"transition_shape"));
    }

    #[test]
    fn root_name_cannot_be_declared() {
        let definition = Definition::new(
            atomic(&["A", INIT_STATE]),
            &["next"],
            vec![init("A"), go("A", "next", "A")],
        );
        assert!(violated(&definition).contains(&"root_name_not_reused"));
    }

    #[test]
    fn empty_machine_is_rejected() {
        let definition = Definition::new(Vec::new(), &[], Vec::new());
        let violated = violated(&definition);

        assert!(violated.contains(&"at_least_one_state"));
        assert!(violated.contains(&"single_initial_transition"));
    }

    #[test]
    fn unused_declared_state_is_reported() {
        let mut definition = valid();
        definition.states.push(StateNode::atomic("Orphan"));
        assert_eq!(violated(&definition), vec!["states_match_transitions"]);
    }

    #[test]
    fn root_accepts_only_init() {
        let mut definition = valid();
        definition.transitions.push(go(INIT_STATE, "next", "B"));
        assert!(violated(&definition).contains(&"states_match_transitions"));
    }

    #[test]
    fn initial_control_state_excludes_explicit_init() {
        let mut definition = valid();
        definition.initial_control_state = Some("B".to_string());
        assert!(violated(&definition).contains(&"single_initial_transition"));
    }

    #[test]
    fn initial_control_state_alone_is_enough() {
        let mut definition = valid();
        definition.transitions.remove(0);
        definition.initial_control_state = Some("B".to_string());
        assert!(definition.check().is_ok());
    }

    #[test]
    fn init_from_atomic_state_is_rejected() {
        let mut definition = valid();
        definition.transitions.push(go("A", INIT_EVENT, "B"));
        assert!(violated(&definition).contains(&"init_only_from_compound"));
    }

    #[test]
    fn compound_without_init_is_rejected() {
        let definition = Definition::new(
            vec![StateNode::atomic("A"), StateNode::compound("C", atomic(&["X"]))],
            &["in", "out"],
            vec![init("A"), go("A", "in", "C"), go("X", "out", "A")],
        );
        assert_eq!(violated(&definition), vec!["compound_init_valid"]);
    }

    #[test]
    fn compound_init_must_target_descendant() {
        let definition = Definition::new(
            vec![StateNode::atomic("A"), StateNode::compound("C", atomic(&["X"]))],
            &["in", "out"],
            vec![
                init("A"),
                go("A", "in", "C"),
                go("C", INIT_EVENT, "A"),
                go("X", "out", "A"),
            ],
        );
        assert_eq!(violated(&definition), vec!["compound_init_valid"]);
    }

    #[test]
    fn compound_init_cannot_be_guarded() {
        let definition = Definition::new(
            vec![StateNode::atomic("A"), StateNode::compound("C", atomic(&["X"]))],
            &["in", "out"],
            vec![
                init("A"),
                go("A", "in", "C"),
                Transition::guarded(
                    "C",
                    INIT_EVENT,
                    vec![GuardedTarget::when(Guard::new("never", |_, _, _| false), "X", Action::identity())],
                ),
                go("X", "out", "A"),
            ],
        );
        assert_eq!(violated(&definition), vec!["compound_init_valid"]);
    }

    #[test]
    fn eventless_state_cannot_have_other_transitions() {
        let mut definition = valid();
        definition.transitions.push(Transition::automatic(
            "A",
            vec![GuardedTarget::always("B", Action::identity())],
        ));
        assert_eq!(violated(&definition), vec!["no_mixed_eventless"]);
    }

    #[test]
    fn eventless_atomic_self_loop_is_rejected() {
        let mut definition = valid();
        definition.transitions[2] = Transition::automatic(
            "B",
            vec![
                GuardedTarget::when(Guard::new("done", |_, _, _| true), "A", Action::identity()),
                GuardedTarget::when(Guard::new("again", |_, _, _| true), "B", Action::identity()),
            ],
        );
        assert_eq!(violated(&definition), vec!["no_eventless_atomic_self_loop"]);
    }

    #[test]
    fn split_guard_rows_are_rejected() {
        let mut definition = valid();
        definition.transitions.push(go("A", "next", "A"));
        assert_eq!(violated(&definition), vec!["guards_in_single_row"]);
    }

    #[test]
    fn ancestor_and_descendant_cannot_share_event() {
        let definition = Definition::new(
            vec![StateNode::atomic("A"), StateNode::compound("C", atomic(&["X"]))],
            &["in", "out"],
            vec![
                init("A"),
                go("A", "in", "C"),
                go("C", INIT_EVENT, "X"),
                go("C", "out", "A"),
                go("X", "out", "A"),
            ],
        );
        assert_eq!(violated(&definition), vec!["no_ancestor_conflicts"]);
    }

    #[test]
    fn history_of_atomic_state_is_rejected() {
        let mut definition = valid();
        definition.transitions[2] =
            Transition::new("B", "next", HistoryTarget::deep("A"), Action::identity());
        assert_eq!(violated(&definition), vec!["history_targets_valid"]);
    }

    #[test]
    fn contract_battery_is_named_and_ordered() {
        let contracts = default_contracts();

        assert_eq!(contracts.len(), 18);
        assert_eq!(contracts[0].name, "well_formed_definition");
        assert_eq!(contracts[17].name, "history_targets_valid");
        assert!(contracts.iter().all(|c| !c.should_throw_immediately));
    }
}
