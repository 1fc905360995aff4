//! The built-in contract checks.
//!
//! Each check inspects the definition through its [`ContractContext`] and
//! accumulates every violation it finds rather than stopping at the first.

use crate::contracts::context::ContractContext;
use crate::contracts::violations::ContractViolation;
use crate::core::{StateNode, AUTO_EVENT, INIT_EVENT, INIT_STATE};
use crate::traversal::{traverse, TraversalOrder};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Verdict = Validation<(), NonEmptyVec<ContractViolation>>;

fn verdict(violations: Vec<ContractViolation>) -> Verdict {
    if violations.is_empty() {
        return Validation::success(());
    }
    let checks: Vec<Verdict> = violations
        .into_iter()
        .map(|violation| Validation::fail(violation))
        .collect();
    Validation::all_vec(checks).map(|_| ())
}

fn event_label(event: Option<&str>) -> &str {
    event.unwrap_or("<eventless>")
}

pub(super) fn well_formed_definition(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "well_formed_definition";
    let mut violations = Vec::new();

    let root = StateNode::root(ctx.states);
    let unnamed = traverse(
        &root,
        |node| {
            let node: &StateNode = *node;
            node.children().iter().collect()
        },
        Vec::new(),
        |mut parents: Vec<String>, visit| {
            if visit.node.name().is_empty() {
                parents.push(visit.parent.map(|p| p.name().to_string()).unwrap_or_default());
            }
            parents
        },
        TraversalOrder::PreOrder,
    );
    for parent in unnamed {
        violations.push(ContractViolation::new(
            NAME,
            format!("a child of `{parent}` has an empty name"),
            json!({ "parent": parent }),
        ));
    }
    for (row, shape) in ctx.indices.rows.iter().enumerate() {
        if shape.from.is_empty() {
            violations.push(ContractViolation::new(
                NAME,
                format!("transition row {row} has an empty origin state"),
                json!({ "row": row }),
            ));
        }
    }
    if ctx.settings.max_cascade_depth == 0 {
        violations.push(ContractViolation::new(
            NAME,
            "max_cascade_depth must be at least 1",
            json!({ "max_cascade_depth": 0 }),
        ));
    }

    verdict(violations)
}

pub(super) fn initial_control_state_declared(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "initial_control_state_declared";
    let violations = match ctx.initial_control_state {
        Some(state) if state == INIT_STATE || !ctx.indices.state_list.iter().any(|s| s == state) => {
            vec![ContractViolation::new(
                NAME,
                format!("initial control state `{state}` is not a declared state"),
                json!({ "initial_control_state": state }),
            )]
        }
        _ => Vec::new(),
    };
    verdict(violations)
}

pub(super) fn no_transition_to_root(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "no_transition_to_root";
    let violations = ctx
        .indices
        .transitions
        .iter()
        .filter(|flat| flat.to.state_name() == INIT_STATE)
        .map(|flat| {
            ContractViolation::new(
                NAME,
                format!(
                    "transition from `{}` on `{}` targets the reserved root state",
                    flat.from,
                    event_label(flat.event.as_deref())
                ),
                json!({ "row": flat.row, "position": flat.position }),
            )
        })
        .collect();
    verdict(violations)
}

pub(super) fn event_names_valid(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "event_names_valid";
    let mut violations = Vec::new();

    for event in ctx.events {
        if event.is_empty() {
            violations.push(ContractViolation::new(
                NAME,
                "declared events must have non-empty names",
                json!({ "events": ctx.events }),
            ));
        } else if event == INIT_EVENT {
            violations.push(ContractViolation::new(
                NAME,
                format!("`{INIT_EVENT}` is reserved and cannot be declared"),
                json!({ "event": event }),
            ));
        }
    }
    for (row, shape) in ctx.indices.rows.iter().enumerate() {
        if shape.event.as_deref() == Some(AUTO_EVENT) {
            violations.push(ContractViolation::new(
                NAME,
                format!(
                    "transition row {row} from `{}` uses an empty event name; eventless transitions carry no event",
                    shape.from
                ),
                json!({ "row": row }),
            ));
        }
    }

    verdict(violations)
}

pub(super) fn transition_shape(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "transition_shape";
    let mut violations = Vec::new();

    for (row, shape) in ctx.indices.rows.iter().enumerate() {
        if shape.guards == 0 {
            violations.push(ContractViolation::new(
                NAME,
                format!(
                    "transition from `{}` on `{}` has no target",
                    shape.from,
                    event_label(shape.event.as_deref())
                ),
                json!({ "row": row }),
            ));
        } else if shape.unguarded > 0 && shape.guards > 1 {
            violations.push(ContractViolation::new(
                NAME,
                format!(
                    "transition from `{}` on `{}` mixes unconditional and guarded targets",
                    shape.from,
                    event_label(shape.event.as_deref())
                ),
                json!({ "row": row, "guards": shape.guards, "unguarded": shape.unguarded }),
            ));
        }
    }

    verdict(violations)
}

pub(super) fn unique_state_names(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "unique_state_names";
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut violations = Vec::new();

    for name in &ctx.indices.state_list {
        if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
            violations.push(ContractViolation::new(
                NAME,
                format!("state `{name}` is declared more than once"),
                json!({ "state": name }),
            ));
        }
    }

    verdict(violations)
}

pub(super) fn root_name_not_reused(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "root_name_not_reused";
    let violations = if ctx.indices.state_list.iter().any(|s| s == INIT_STATE) {
        vec![ContractViolation::new(
            NAME,
            format!("`{INIT_STATE}` is reserved for the root state"),
            json!({ "state": INIT_STATE }),
        )]
    } else {
        Vec::new()
    };
    verdict(violations)
}

pub(super) fn at_least_one_state(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "at_least_one_state";
    let violations = if ctx.indices.state_list.is_empty() {
        vec![ContractViolation::new(
            NAME,
            "a machine needs at least one control state",
            json!({ "states": [] }),
        )]
    } else {
        Vec::new()
    };
    verdict(violations)
}

pub(super) fn events_match_transitions(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "events_match_transitions";
    let declared: BTreeSet<&str> = ctx
        .events
        .iter()
        .map(String::as_str)
        .filter(|e| !e.is_empty() && *e != INIT_EVENT)
        .collect();
    let used: BTreeSet<&str> = ctx
        .indices
        .rows
        .iter()
        .filter_map(|shape| shape.event.as_deref())
        .filter(|e| *e != INIT_EVENT && *e != AUTO_EVENT)
        .collect();

    let mut violations = Vec::new();
    for event in declared.difference(&used) {
        violations.push(ContractViolation::new(
            NAME,
            format!("event `{event}` is declared but no transition uses it"),
            json!({ "event": event }),
        ));
    }
    for event in used.difference(&declared) {
        violations.push(ContractViolation::new(
            NAME,
            format!("event `{event}` is used by a transition but never declared"),
            json!({ "event": event }),
        ));
    }

    verdict(violations)
}

pub(super) fn states_match_transitions(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "states_match_transitions";
    let declared: BTreeSet<&str> = ctx.indices.state_list.iter().map(String::as_str).collect();
    let mut referenced: BTreeSet<&str> = BTreeSet::new();
    let mut violations = Vec::new();

    for (row, shape) in ctx.indices.rows.iter().enumerate() {
        if shape.from == INIT_STATE {
            if shape.event.as_deref() != Some(INIT_EVENT) {
                violations.push(ContractViolation::new(
                    NAME,
                    format!(
                        "the root state only accepts `{INIT_EVENT}`, found `{}`",
                        event_label(shape.event.as_deref())
                    ),
                    json!({ "row": row }),
                ));
            }
        } else {
            referenced.insert(shape.from.as_str());
        }
    }
    for flat in &ctx.indices.transitions {
        let target = flat.to.state_name();
        if target != INIT_STATE {
            referenced.insert(target);
        }
    }

    for state in declared.difference(&referenced) {
        violations.push(ContractViolation::new(
            NAME,
            format!("state `{state}` is declared but no transition references it"),
            json!({ "state": state }),
        ));
    }
    for state in referenced.difference(&declared) {
        violations.push(ContractViolation::new(
            NAME,
            format!("state `{state}` is referenced by a transition but never declared"),
            json!({ "state": state }),
        ));
    }

    verdict(violations)
}

pub(super) fn single_initial_transition(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "single_initial_transition";
    let explicit = ctx.explicit_initial_transitions;
    let message = match (ctx.initial_control_state, explicit) {
        (Some(_), 0) | (None, 1) => None,
        (Some(state), _) => Some(format!(
            "initial control state `{state}` given alongside an explicit `{INIT_EVENT}` transition from the root"
        )),
        (None, 0) => Some(format!(
            "no initial control state and no `{INIT_EVENT}` transition from the root"
        )),
        (None, count) => Some(format!(
            "{count} `{INIT_EVENT}` transitions from the root, expected exactly one"
        )),
    };

    let violations = message
        .map(|message| {
            vec![ContractViolation::new(
                NAME,
                message,
                json!({
                    "initial_control_state": ctx.initial_control_state,
                    "explicit_initial_transitions": explicit,
                }),
            )]
        })
        .unwrap_or_default();
    verdict(violations)
}

pub(super) fn init_only_from_compound(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "init_only_from_compound";
    let violations = ctx
        .indices
        .rows
        .iter()
        .enumerate()
        .filter(|(_, shape)| shape.event.as_deref() == Some(INIT_EVENT))
        .filter(|(_, shape)| shape.from != INIT_STATE && !ctx.indices.is_compound(&shape.from))
        .map(|(row, shape)| {
            ContractViolation::new(
                NAME,
                format!("`{INIT_EVENT}` transition from non-compound state `{}`", shape.from),
                json!({ "row": row, "state": shape.from }),
            )
        })
        .collect();
    verdict(violations)
}

pub(super) fn compound_init_valid(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "compound_init_valid";
    let mut violations = Vec::new();

    let compounds = ctx
        .indices
        .states_type
        .iter()
        .filter(|(name, compound)| **compound && name.as_str() != INIT_STATE)
        .map(|(name, _)| name.as_str());

    for state in compounds {
        let rows: &[usize] = ctx
            .indices
            .states_transitions_maps
            .get(state)
            .and_then(|events| events.get(INIT_EVENT))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let row = match rows {
            [row] => *row,
            [] => {
                violations.push(ContractViolation::new(
                    NAME,
                    format!("compound state `{state}` has no `{INIT_EVENT}` transition"),
                    json!({ "state": state }),
                ));
                continue;
            }
            _ => {
                violations.push(ContractViolation::new(
                    NAME,
                    format!("compound state `{state}` has {} `{INIT_EVENT}` transitions", rows.len()),
                    json!({ "state": state, "rows": rows }),
                ));
                continue;
            }
        };

        let shape = &ctx.indices.rows[row];
        if shape.guards != 1 || shape.unguarded != 1 {
            violations.push(ContractViolation::new(
                NAME,
                format!("`{INIT_EVENT}` transition of `{state}` must be unconditional"),
                json!({ "state": state, "row": row }),
            ));
            continue;
        }

        let target = ctx.indices.transitions.iter().find(|flat| flat.row == row);
        if let Some(flat) = target {
            if flat.to.is_history() {
                violations.push(ContractViolation::new(
                    NAME,
                    format!("`{INIT_EVENT}` transition of `{state}` cannot target a history state"),
                    json!({ "state": state, "target": flat.to.to_string() }),
                ));
            } else if !ctx.indices.is_strict_ancestor(state, flat.to.state_name()) {
                violations.push(ContractViolation::new(
                    NAME,
                    format!(
                        "`{INIT_EVENT}` transition of `{state}` targets `{}`, which is not one of its descendants",
                        flat.to
                    ),
                    json!({ "state": state, "target": flat.to.state_name() }),
                ));
            }
        }
    }

    verdict(violations)
}

pub(super) fn no_mixed_eventless(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "no_mixed_eventless";
    let violations = ctx
        .indices
        .states_transitions_maps
        .iter()
        .filter(|(_, events)| events.contains_key(AUTO_EVENT) && events.len() > 1)
        .map(|(state, events)| {
            let others: Vec<&str> = events
                .keys()
                .map(String::as_str)
                .filter(|e| *e != AUTO_EVENT)
                .collect();
            ContractViolation::new(
                NAME,
                format!("state `{state}` has an eventless transition alongside transitions on {others:?}"),
                json!({ "state": state, "events": others }),
            )
        })
        .collect();
    verdict(violations)
}

pub(super) fn no_eventless_atomic_self_loop(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "no_eventless_atomic_self_loop";
    let violations = ctx
        .indices
        .transitions
        .iter()
        .filter(|flat| flat.event.is_none() && !flat.to.is_history())
        .filter(|flat| flat.to.state_name() == flat.from && !ctx.indices.is_compound(&flat.from))
        .map(|flat| {
            ContractViolation::new(
                NAME,
                format!("atomic state `{}` has an eventless transition to itself", flat.from),
                json!({ "state": flat.from, "row": flat.row, "position": flat.position }),
            )
        })
        .collect();
    verdict(violations)
}

pub(super) fn guards_in_single_row(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "guards_in_single_row";
    let mut violations = Vec::new();

    for (state, events) in &ctx.indices.states_transitions_maps {
        for (event, rows) in events {
            if rows.len() > 1 {
                violations.push(ContractViolation::new(
                    NAME,
                    format!(
                        "state `{state}` declares {} separate transitions on `{}`; list the guards in one transition",
                        rows.len(),
                        event_label(Some(event.as_str()).filter(|e| !e.is_empty()))
                    ),
                    json!({ "state": state, "event": event, "rows": rows }),
                ));
            }
        }
    }

    verdict(violations)
}

pub(super) fn no_ancestor_conflicts(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "no_ancestor_conflicts";
    let mut violations = Vec::new();

    let handled = ctx
        .indices
        .event_transitions_maps
        .iter()
        .filter(|(event, _)| event.as_str() != INIT_EVENT);

    for (event, origins) in handled {
        let origins: Vec<&str> = origins.keys().map(String::as_str).collect();
        for ancestor in &origins {
            for state in &origins {
                if ctx.indices.is_strict_ancestor(ancestor, state) {
                    violations.push(ContractViolation::new(
                        NAME,
                        format!(
                            "`{ancestor}` and its descendant `{state}` both handle `{}`",
                            event_label(Some(event.as_str()).filter(|e| !e.is_empty()))
                        ),
                        json!({ "event": event, "ancestor": ancestor, "state": state }),
                    ));
                }
            }
        }
    }

    verdict(violations)
}

pub(super) fn history_targets_valid(ctx: &ContractContext<'_>) -> Verdict {
    const NAME: &str = "history_targets_valid";
    let mut violations = Vec::new();

    for (state, flats) in &ctx.indices.history_states_map {
        let reason = if !ctx.indices.contains(state) || state == INIT_STATE {
            Some("is not a declared state")
        } else if !ctx.indices.is_compound(state) {
            Some("is atomic and has no history")
        } else {
            None
        };
        if let Some(reason) = reason {
            let origins: BTreeMap<&str, usize> = flats
                .iter()
                .filter_map(|i| ctx.indices.transitions.get(*i))
                .map(|flat| (flat.from.as_str(), flat.row))
                .collect();
            violations.push(ContractViolation::new(
                NAME,
                format!("history target `{state}` {reason}"),
                json!({ "state": state, "origins": origins }),
            ));
        }
    }

    verdict(violations)
}
