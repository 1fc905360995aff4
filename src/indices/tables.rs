//! Transition lookup tables, folded from the guard-expanded transition list.

use crate::core::{Model, Target, Transition, AUTO_EVENT, INIT_EVENT, INIT_STATE};
use serde::Serialize;
use std::collections::BTreeMap;

/// One guarded target of one transition row, flattened for introspection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlatTransition {
    /// Index of the transition row in the definition.
    pub row: usize,
    /// Position of this guarded target within its row.
    pub position: usize,
    pub from: String,
    /// `None` for eventless transitions.
    pub event: Option<String>,
    /// Guard name; `None` when the target is unconditional.
    pub guard: Option<String>,
    pub to: Target,
    pub action: String,
}

/// Guard-list shape of a transition row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowShape {
    pub from: String,
    pub event: Option<String>,
    pub guards: usize,
    pub unguarded: usize,
}

#[derive(Default)]
pub(super) struct Tables {
    pub rows: Vec<RowShape>,
    pub transitions: Vec<FlatTransition>,
    pub states_transitions_map: BTreeMap<String, BTreeMap<String, usize>>,
    pub states_transitions_maps: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
    pub event_transitions_maps: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
    pub history_states_map: BTreeMap<String, Vec<usize>>,
    pub target_states_map: BTreeMap<String, Vec<usize>>,
    pub initial_rows: Vec<usize>,
}

/// Table key of a row's event: eventless rows use the reserved empty key.
pub(crate) fn event_key(event: Option<&str>) -> &str {
    event.unwrap_or(AUTO_EVENT)
}

pub(super) fn fold_transitions<M: Model>(transitions: &[Transition<M>]) -> Tables {
    transitions
        .iter()
        .enumerate()
        .fold(Tables::default(), |mut tables, (row, transition)| {
            tables.rows.push(RowShape {
                from: transition.from.clone(),
                event: transition.event.clone(),
                guards: transition.guards.len(),
                unguarded: transition
                    .guards
                    .iter()
                    .filter(|g| g.predicate.is_none())
                    .count(),
            });

            for (position, guarded) in transition.guards.iter().enumerate() {
                let flat_index = tables.transitions.len();
                tables
                    .target_states_map
                    .entry(guarded.to.state_name().to_string())
                    .or_default()
                    .push(flat_index);
                if guarded.to.is_history() {
                    tables
                        .history_states_map
                        .entry(guarded.to.state_name().to_string())
                        .or_default()
                        .push(flat_index);
                }
                tables.transitions.push(FlatTransition {
                    row,
                    position,
                    from: transition.from.clone(),
                    event: transition.event.clone(),
                    guard: guarded.predicate.as_ref().map(|g| g.name().to_string()),
                    to: guarded.to.clone(),
                    action: guarded.action.name().to_string(),
                });
            }

            let event = event_key(transition.event.as_deref()).to_string();
            if transition.from == INIT_STATE {
                // Only the machine's own init transition originates at the
                // root, and it is started directly rather than looked up.
                if event == INIT_EVENT {
                    tables.initial_rows.push(row);
                }
                return tables;
            }

            tables
                .states_transitions_map
                .entry(transition.from.clone())
                .or_default()
                .entry(event.clone())
                .or_insert(row);
            tables
                .states_transitions_maps
                .entry(transition.from.clone())
                .or_default()
                .entry(event.clone())
                .or_default()
                .push(row);
            tables
                .event_transitions_maps
                .entry(event)
                .or_default()
                .entry(transition.from.clone())
                .or_default()
                .push(row);
            tables
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, Guard, GuardedTarget, HistoryTarget};

    struct Unit;

    impl Model for Unit {
        type ExtendedState = ();
        type Update = ();
        type EventData = ();
        type Output = ();
    }

    fn sample() -> Vec<Transition<Unit>> {
        vec![
            Transition::new(INIT_STATE, INIT_EVENT, "A", Action::identity()),
            Transition::guarded(
                "A",
                "go",
                vec![
                    GuardedTarget::when(Guard::new("left", |_, _, _| true), "B", Action::identity()),
                    GuardedTarget::when(
                        Guard::new("right", |_, _, _| false),
                        HistoryTarget::deep("C"),
                        Action::identity(),
                    ),
                ],
            ),
            Transition::automatic("B", vec![GuardedTarget::always("A", Action::identity())]),
        ]
    }

    #[test]
    fn guards_are_flattened_in_order() {
        let tables = fold_transitions(&sample());

        assert_eq!(tables.transitions.len(), 4);
        assert_eq!(tables.transitions[1].guard.as_deref(), Some("left"));
        assert_eq!(tables.transitions[2].guard.as_deref(), Some("right"));
        assert_eq!(tables.transitions[2].row, 1);
        assert_eq!(tables.transitions[2].position, 1);
        assert_eq!(tables.transitions[3].guard, None);
    }

    #[test]
    fn row_shapes_count_unguarded_targets() {
        let tables = fold_transitions(&sample());
        assert_eq!(tables.rows[1].guards, 2);
        assert_eq!(tables.rows[1].unguarded, 0);
        assert_eq!(tables.rows[2].unguarded, 1);
    }

    #[test]
    fn root_init_is_kept_out_of_dispatch_tables() {
        let tables = fold_transitions(&sample());

        assert_eq!(tables.initial_rows, vec![0]);
        assert!(!tables.states_transitions_map.contains_key(INIT_STATE));
        assert!(!tables.event_transitions_maps.contains_key(INIT_EVENT));
    }

    #[test]
    fn eventless_rows_use_reserved_key() {
        let tables = fold_transitions(&sample());
        assert_eq!(tables.states_transitions_map["B"][AUTO_EVENT], 2);
        assert_eq!(tables.event_transitions_maps[AUTO_EVENT]["B"], vec![2]);
    }

    #[test]
    fn targets_and_history_targets_are_indexed() {
        let tables = fold_transitions(&sample());

        assert_eq!(tables.target_states_map["A"], vec![0, 3]);
        assert_eq!(tables.target_states_map["C"], vec![2]);
        assert_eq!(tables.history_states_map["C"], vec![2]);
        assert!(!tables.history_states_map.contains_key("B"));
    }

    #[test]
    fn split_rows_are_all_recorded() {
        let mut transitions = sample();
        transitions.push(Transition::new("A", "go", "B", Action::identity()));
        let tables = fold_transitions(&transitions);

        assert_eq!(tables.states_transitions_maps["A"]["go"], vec![1, 3]);
        assert_eq!(tables.states_transitions_map["A"]["go"], 1);
    }
}
