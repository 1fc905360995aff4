//! Generic tree traversal.
//!
//! One walker serves breadth-first, pre-order and post-order traversal. The
//! order is chosen by the frontier discipline (queue or stack) and, for
//! post-order, by expanding each node into "children, then itself" before it
//! is visited. Every visit receives the node, its parent, and its path: the
//! child indices leading to it from the root.
//!
//! # Example
//!
//! ```rust
//! use hfsm::traversal::{traverse, TraversalOrder};
//!
//! // Nodes 0, 1 and 2 have children 2n+1 and 2n+2; the rest are leaves.
//! let children = |n: &u32| -> Vec<u32> {
//!     if *n < 3 { vec![2 * n + 1, 2 * n + 2] } else { Vec::new() }
//! };
//!
//! let order = |order| {
//!     traverse(0u32, children, Vec::new(), |mut acc: Vec<u32>, visit| {
//!         acc.push(*visit.node);
//!         acc
//!     }, order)
//! };
//!
//! assert_eq!(order(TraversalOrder::Bfs), vec![0, 1, 2, 3, 4, 5, 6]);
//! assert_eq!(order(TraversalOrder::PreOrder), vec![0, 1, 3, 4, 2, 5, 6]);
//! assert_eq!(order(TraversalOrder::PostOrder), vec![3, 4, 1, 5, 6, 2, 0]);
//! ```

mod frontier;

pub use frontier::{Frontier, Queue, Stack};

/// Visiting order of [`traverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalOrder {
    Bfs,
    PreOrder,
    PostOrder,
}

/// What the visitor sees of a node.
#[derive(Debug)]
pub struct Visit<'a, T> {
    pub node: &'a T,
    pub parent: Option<&'a T>,
    /// Child indices from the root down to `node`; empty for the root.
    pub path: &'a [usize],
}

impl<T> Visit<'_, T> {
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

struct Entry<T> {
    node: T,
    parent: Option<T>,
    path: Vec<usize>,
    expanded: bool,
}

impl<T: Clone> Entry<T> {
    fn root(node: T) -> Self {
        Self {
            node,
            parent: None,
            path: Vec::new(),
            expanded: false,
        }
    }

    fn children(&self, children: Vec<T>) -> Vec<Entry<T>> {
        children
            .into_iter()
            .enumerate()
            .map(|(index, child)| {
                let mut path = self.path.clone();
                path.push(index);
                Entry {
                    node: child,
                    parent: Some(self.node.clone()),
                    path,
                    expanded: false,
                }
            })
            .collect()
    }
}

/// Fold `visit` over every node reachable from `root`, each exactly once.
pub fn traverse<T, A, C, V>(root: T, children_of: C, seed: A, visit: V, order: TraversalOrder) -> A
where
    T: Clone,
    C: Fn(&T) -> Vec<T>,
    V: FnMut(A, Visit<'_, T>) -> A,
{
    match order {
        TraversalOrder::Bfs => walk(Queue::default(), root, children_of, seed, visit, false),
        TraversalOrder::PreOrder => walk(Stack::default(), root, children_of, seed, visit, false),
        TraversalOrder::PostOrder => walk(Stack::default(), root, children_of, seed, visit, true),
    }
}

fn walk<T, A, F, C, V>(
    mut frontier: F,
    root: T,
    children_of: C,
    seed: A,
    mut visit: V,
    children_first: bool,
) -> A
where
    T: Clone,
    F: Frontier<Entry<T>>,
    C: Fn(&T) -> Vec<T>,
    V: FnMut(A, Visit<'_, T>) -> A,
{
    frontier.push(Entry::root(root));
    let mut acc = seed;

    while let Some(mut entry) = frontier.pop() {
        // An expanded entry has already scheduled its children.
        let children = if entry.expanded {
            Vec::new()
        } else {
            children_of(&entry.node)
        };
        let pending = entry.children(children);

        if children_first && !pending.is_empty() {
            entry.expanded = true;
            let mut expansion = pending;
            expansion.push(entry);
            frontier.push_all(expansion);
            continue;
        }

        frontier.push_all(pending);
        acc = visit(
            acc,
            Visit {
                node: &entry.node,
                parent: entry.parent.as_ref(),
                path: &entry.path,
            },
        );
    }

    acc
}
