//! Frontier disciplines for the tree walker.

use std::collections::VecDeque;

/// Pending nodes of a walk.
///
/// `push_all` receives siblings in tree order; each discipline arranges them
/// so that `pop` yields them in the order the walk needs.
pub trait Frontier<T> {
    fn push(&mut self, item: T);
    fn push_all(&mut self, items: Vec<T>);
    fn pop(&mut self) -> Option<T>;
}

/// FIFO frontier: breadth-first.
#[derive(Debug)]
pub struct Queue<T>(VecDeque<T>);

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self(VecDeque::new())
    }
}

impl<T> Frontier<T> for Queue<T> {
    fn push(&mut self, item: T) {
        self.0.push_back(item);
    }

    fn push_all(&mut self, items: Vec<T>) {
        self.0.extend(items);
    }

    fn pop(&mut self) -> Option<T> {
        self.0.pop_front()
    }
}

/// LIFO frontier: depth-first. Siblings are pushed in reverse so the first
/// one is popped first.
#[derive(Debug)]
pub struct Stack<T>(Vec<T>);

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Frontier<T> for Stack<T> {
    fn push(&mut self, item: T) {
        self.0.push(item);
    }

    fn push_all(&mut self, items: Vec<T>) {
        self.0.extend(items.into_iter().rev());
    }

    fn pop(&mut self) -> Option<T> {
        self.0.pop()
    }
}
