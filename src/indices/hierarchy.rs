//! Indices derived from the control state hierarchy, one traversal each.

use crate::core::StateNode;
use crate::traversal::{traverse, TraversalOrder};
use std::collections::BTreeMap;

fn children_of<'a>(node: &&'a StateNode) -> Vec<&'a StateNode> {
    node.children.iter().collect()
}

/// Declared state names in pre-order, duplicates kept, root excluded.
pub(super) fn state_list(root: &StateNode) -> Vec<String> {
    traverse(
        root,
        children_of,
        Vec::new(),
        |mut acc: Vec<String>, visit| {
            if visit.parent.is_some() {
                acc.push(visit.node.name.clone());
            }
            acc
        },
        TraversalOrder::PreOrder,
    )
}

/// State name to "is compound".
pub(super) fn states_type(root: &StateNode) -> BTreeMap<String, bool> {
    traverse(
        root,
        children_of,
        BTreeMap::new(),
        |mut acc: BTreeMap<String, bool>, visit| {
            acc.insert(visit.node.name.clone(), visit.node.is_compound());
            acc
        },
        TraversalOrder::PreOrder,
    )
}

/// State name to its dot-joined index path, the root being `"0"`.
pub(super) fn states_path(root: &StateNode) -> BTreeMap<String, String> {
    traverse(
        root,
        children_of,
        BTreeMap::new(),
        |mut acc: BTreeMap<String, String>, visit| {
            let path = std::iter::once(0)
                .chain(visit.path.iter().copied())
                .map(|index| index.to_string())
                .collect::<Vec<_>>()
                .join(".");
            acc.insert(visit.node.name.clone(), path);
            acc
        },
        TraversalOrder::Bfs,
    )
}

/// State name to the names of its direct children.
pub(super) fn ancestor_map(root: &StateNode) -> BTreeMap<String, Vec<String>> {
    traverse(
        root,
        children_of,
        BTreeMap::new(),
        |mut acc: BTreeMap<String, Vec<String>>, visit| {
            let children = visit.node.children.iter().map(|c| c.name.clone()).collect();
            acc.insert(visit.node.name.clone(), children);
            acc
        },
        TraversalOrder::PreOrder,
    )
}

/// State name to its parent's name; top-level states map to the root.
pub(super) fn parent_map(root: &StateNode) -> BTreeMap<String, String> {
    traverse(
        root,
        children_of,
        BTreeMap::new(),
        |mut acc: BTreeMap<String, String>, visit| {
            if let Some(parent) = visit.parent {
                acc.insert(visit.node.name.clone(), parent.name.clone());
            }
            acc
        },
        TraversalOrder::Bfs,
    )
}

/// State name to all of its strict descendants.
pub(super) fn descendants(root: &StateNode) -> BTreeMap<String, Vec<String>> {
    traverse(
        root,
        children_of,
        BTreeMap::new(),
        |mut acc: BTreeMap<String, Vec<String>>, visit| {
            let mut below = Vec::new();
            for child in &visit.node.children {
                below.push(child.name.clone());
                if let Some(nested) = acc.get(&child.name) {
                    below.extend(nested.iter().cloned());
                }
            }
            acc.insert(visit.node.name.clone(), below);
            acc
        },
        TraversalOrder::PostOrder,
    )
}

/// Ancestors used for history bookkeeping.
pub(super) struct HistoryMaps {
    /// State name to its direct parent, for states below the top level.
    pub shallow: BTreeMap<String, String>,
    /// State name to its compound ancestors, parent first, root excluded.
    pub deep: BTreeMap<String, Vec<String>>,
}

pub(super) fn compute_history_maps(root: &StateNode) -> HistoryMaps {
    let seed = HistoryMaps {
        shallow: BTreeMap::new(),
        deep: BTreeMap::new(),
    };

    traverse(
        root,
        children_of,
        seed,
        |mut acc: HistoryMaps, visit| {
            let name = visit.node.name.clone();
            match visit.parent {
                Some(parent) if visit.depth() > 1 => {
                    let mut chain = vec![parent.name.clone()];
                    if let Some(above) = acc.deep.get(&parent.name) {
                        chain.extend(above.iter().cloned());
                    }
                    acc.shallow.insert(name.clone(), parent.name.clone());
                    acc.deep.insert(name, chain);
                }
                _ => {
                    acc.deep.insert(name, Vec::new());
                }
            }
            acc
        },
        TraversalOrder::PreOrder,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::INIT_STATE;

    // Idle, Loaded > { Stopped, Active > { Playing, Paused } }
    fn hierarchy() -> StateNode {
        StateNode::root(&[
            StateNode::atomic("Idle"),
            StateNode::compound(
                "Loaded",
                vec![
                    StateNode::atomic("Stopped"),
                    StateNode::compound(
                        "Active",
                        vec![StateNode::atomic("Playing"), StateNode::atomic("Paused")],
                    ),
                ],
            ),
        ])
    }

    #[test]
    fn state_list_excludes_root() {
        assert_eq!(
            state_list(&hierarchy()),
            vec!["Idle", "Loaded", "Stopped", "Active", "Playing", "Paused"]
        );
    }

    #[test]
    fn state_list_keeps_duplicates() {
        let root = StateNode::root(&[
            StateNode::atomic("A"),
            StateNode::compound("B", vec![StateNode::atomic("A")]),
        ]);
        assert_eq!(state_list(&root), vec!["A", "B", "A"]);
    }

    #[test]
    fn states_type_flags_compound_states() {
        let types = states_type(&hierarchy());
        assert!(types["Loaded"]);
        assert!(types["Active"]);
        assert!(!types["Idle"]);
        assert!(!types["Paused"]);
        assert!(types[INIT_STATE]);
    }

    #[test]
    fn states_path_joins_child_indices() {
        let paths = states_path(&hierarchy());
        assert_eq!(paths[INIT_STATE], "0");
        assert_eq!(paths["Idle"], "0.0");
        assert_eq!(paths["Loaded"], "0.1");
        assert_eq!(paths["Paused"], "0.1.1.1");
    }

    #[test]
    fn ancestor_map_lists_direct_children() {
        let map = ancestor_map(&hierarchy());
        assert_eq!(map["Loaded"], vec!["Stopped", "Active"]);
        assert_eq!(map[INIT_STATE], vec!["Idle", "Loaded"]);
        assert!(map["Idle"].is_empty());
    }

    #[test]
    fn parent_map_points_top_level_to_root() {
        let parents = parent_map(&hierarchy());
        assert_eq!(parents["Idle"], INIT_STATE);
        assert_eq!(parents["Playing"], "Active");
        assert!(!parents.contains_key(INIT_STATE));
    }

    #[test]
    fn descendants_include_nested_states() {
        let below = descendants(&hierarchy());
        assert_eq!(
            below["Loaded"],
            vec!["Stopped", "Active", "Playing", "Paused"]
        );
        assert_eq!(below["Active"], vec!["Playing", "Paused"]);
        assert!(below["Idle"].is_empty());
    }

    #[test]
    fn history_maps_exclude_root() {
        let maps = compute_history_maps(&hierarchy());

        assert_eq!(maps.deep["Playing"], vec!["Active", "Loaded"]);
        assert_eq!(maps.deep["Stopped"], vec!["Loaded"]);
        assert!(maps.deep["Loaded"].is_empty());
        assert!(maps.deep["Idle"].is_empty());

        assert_eq!(maps.shallow["Playing"], "Active");
        assert!(!maps.shallow.contains_key("Loaded"));
    }
}
