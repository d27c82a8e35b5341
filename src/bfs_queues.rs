// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Work queue for breadth-first exploration of states and compositions
//!

use std::{
    collections::{HashSet, VecDeque},
    hash::Hash,
};

///
/// A BfsQueue visits every element at most once.
/// - push adds an element at the back of the queue unless this element
///   was pushed before (even if it's already been popped).
/// - pop removes the element at the front of the queue.
///
/// The order in which elements are popped is the discovery order.
///
#[derive(Debug)]
pub struct BfsQueue<T> {
    queue: VecDeque<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> BfsQueue<T> {
    ///
    /// Create an empty queue
    ///
    pub fn new() -> Self {
        BfsQueue {
            queue: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    ///
    /// Create a queue that contains the given roots
    ///
    pub fn from_roots(roots: impl IntoIterator<Item = T>) -> Self {
        let mut queue = Self::new();
        for x in roots {
            queue.push(x);
        }
        queue
    }

    ///
    /// Add an element if it's never been seen
    /// - return true if the element is new
    ///
    pub fn push(&mut self, element: T) -> bool {
        if self.seen.insert(element.clone()) {
            self.queue.push_back(element);
            true
        } else {
            false
        }
    }

    ///
    /// Remove the first element
    /// - return None if the queue is empty
    ///
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }
}

impl<T: Eq + Hash + Clone> Default for BfsQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_visit_once() {
        let mut queue = BfsQueue::from_roots(vec!["A", "B"]);
        assert!(!queue.push("A"));
        assert_eq!(queue.pop(), Some("A"));
        assert!(!queue.push("A"));
        assert!(queue.push("C"));
        assert_eq!(queue.pop(), Some("B"));
        assert_eq!(queue.pop(), Some("C"));
        assert_eq!(queue.pop(), None);
    }
}
