// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Sets of state or block indices with constant-time operations
//!

use std::fmt::Display;

///
/// A set of integers in [0 .. N-1]
/// - insertion, membership, and clearing are O(1)
/// - iteration follows insertion order
///
// Invariants:
// - members[0 .. len-1] are the elements in insertion order
// - x is in the set iff slot[x] < len and members[slot[x]] == x
//
#[derive(Debug, Clone)]
pub struct FastSet {
    slot: Box<[u32]>,
    members: Vec<u32>,
}

impl Display for FastSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for x in &self.members {
            write!(f, " {x}")?;
        }
        write!(f, " }}")
    }
}

impl FastSet {
    ///
    /// Create an empty set for integers in [0 .. bound-1]
    ///
    pub fn new(bound: u32) -> Self {
        FastSet {
            slot: vec![0; bound as usize].into_boxed_slice(),
            members: Vec::new(),
        }
    }

    ///
    /// Membership test
    ///
    pub fn contains(&self, x: u32) -> bool {
        let i = self.slot[x as usize] as usize;
        i < self.members.len() && self.members[i] == x
    }

    ///
    /// Add x to the set
    /// - return true if x was not already present
    ///
    pub fn insert(&mut self, x: u32) -> bool {
        if self.contains(x) {
            false
        } else {
            self.slot[x as usize] = self.members.len() as u32;
            self.members.push(x);
            true
        }
    }

    ///
    /// Remove all elements
    ///
    pub fn reset(&mut self) {
        self.members.clear();
    }

    ///
    /// Elements in insertion order
    ///
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.members.iter().copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test() {
        let set = &mut FastSet::new(50);
        assert!(set.insert(10));
        assert!(set.insert(20));
        assert!(!set.insert(10));
        assert!(set.insert(40));

        println!("After adding 10, 20, 40: {set}");
        assert!(set.contains(10));
        assert!(set.contains(40));
        assert!(!set.contains(30));
        assert_eq!(set.iter().count(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![10, 20, 40]);

        set.reset();
        println!("After reset: {set}");
        assert_eq!(set.iter().count(), 0);
        assert!(!set.contains(10));

        // stale slots must not make old elements reappear
        assert!(set.insert(40));
        assert!(!set.contains(10));
        assert!(!set.contains(20));
        assert_eq!(set.iter().count(), 1);
    }
}
