//! Lookup structures compiled from a machine definition.
//!
//! Every hierarchy index is derived by one traversal of the state tree (rooted
//! at the virtual [`INIT_STATE`]); the transition tables come from one fold
//! over the guard-expanded transition list. Indices are built once and never
//! change for the lifetime of a machine. They are also the whole surface
//! offered to exporters and devtools, hence `Serialize`.

mod hierarchy;
mod tables;

pub use tables::{FlatTransition, RowShape};

pub(crate) use tables::event_key;

use crate::core::{Model, StateNode, Transition, INIT_STATE};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Serialize)]
pub struct Indices {
    /// Declared states in pre-order, root excluded, duplicates kept.
    pub state_list: Vec<String>,
    /// State to "is compound". Includes the root.
    pub states_type: BTreeMap<String, bool>,
    /// State to dot-joined child-index path from the root (`"0"`).
    pub states_path: BTreeMap<String, String>,
    /// State to the names of its direct children.
    pub ancestor_map: BTreeMap<String, Vec<String>>,
    /// State to parent. Top-level states map to the root.
    pub parent_map: BTreeMap<String, String>,
    /// State to all strict descendants.
    pub descendants: BTreeMap<String, Vec<String>>,
    /// State to direct parent, for states below the top level.
    pub shallow_ancestors: BTreeMap<String, String>,
    /// State to compound ancestors, parent first, root excluded.
    pub deep_ancestors: BTreeMap<String, Vec<String>>,
    /// Guard-list shape of each transition row.
    pub rows: Vec<RowShape>,
    /// Guard-expanded transitions, in definition order.
    pub transitions: Vec<FlatTransition>,
    /// from -> event -> first row.
    pub states_transitions_map: BTreeMap<String, BTreeMap<String, usize>>,
    /// from -> event -> all rows.
    pub states_transitions_maps: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
    /// event -> from -> all rows.
    pub event_transitions_maps: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
    /// Compound state -> flat transitions targeting its history.
    pub history_states_map: BTreeMap<String, Vec<usize>>,
    /// State -> flat transitions targeting it, history included.
    pub target_states_map: BTreeMap<String, Vec<usize>>,
    /// Rows of the machine's own init transition.
    pub initial_rows: Vec<usize>,
}

impl Indices {
    pub fn build<M: Model>(states: &[StateNode], transitions: &[Transition<M>]) -> Self {
        let root = StateNode::root(states);
        let history = hierarchy::compute_history_maps(&root);
        let tables = tables::fold_transitions(transitions);

        Self {
            state_list: hierarchy::state_list(&root),
            states_type: hierarchy::states_type(&root),
            states_path: hierarchy::states_path(&root),
            ancestor_map: hierarchy::ancestor_map(&root),
            parent_map: hierarchy::parent_map(&root),
            descendants: hierarchy::descendants(&root),
            shallow_ancestors: history.shallow,
            deep_ancestors: history.deep,
            rows: tables.rows,
            transitions: tables.transitions,
            states_transitions_map: tables.states_transitions_map,
            states_transitions_maps: tables.states_transitions_maps,
            event_transitions_maps: tables.event_transitions_maps,
            history_states_map: tables.history_states_map,
            target_states_map: tables.target_states_map,
            initial_rows: tables.initial_rows,
        }
    }

    /// Whether `state` is part of the hierarchy (root included).
    pub fn contains(&self, state: &str) -> bool {
        self.states_type.contains_key(state)
    }

    pub fn is_compound(&self, state: &str) -> bool {
        self.states_type.get(state).copied().unwrap_or(false)
    }

    /// Row registered on `state` itself for `event` (use `""` for eventless).
    pub fn own_handler(&self, state: &str, event: &str) -> Option<usize> {
        self.states_transitions_map
            .get(state)
            .and_then(|events| events.get(event))
            .copied()
    }

    /// `state` followed by its ancestors up to and including the root.
    pub fn lineage<'a>(&'a self, state: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::successors(Some(state), move |current| {
            self.parent_map.get(*current).map(String::as_str)
        })
    }

    /// Compound ancestors of `state` below the root, parent first.
    pub fn history_ancestors(&self, state: &str) -> &[String] {
        self.deep_ancestors
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `ancestor` strictly contains `state`.
    pub fn is_strict_ancestor(&self, ancestor: &str, state: &str) -> bool {
        match (self.states_path.get(ancestor), self.states_path.get(state)) {
            (Some(outer), Some(inner)) => inner.starts_with(&format!("{outer}.")),
            _ => false,
        }
    }

    /// Number of declared states, root excluded.
    pub fn declared_count(&self) -> usize {
        self.states_type
            .keys()
            .filter(|name| name.as_str() != INIT_STATE)
            .count()
    }
}
