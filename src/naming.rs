// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! State naming schemes
//!
//! The n-th state of a canonical naming pass is named with letter `n mod 26`
//! (from `A` to `Z`) followed by one apostrophe per full cycle of 26:
//! state 0 is `A`, state 25 is `Z`, state 26 is `A'`, state 52 is `A''`.
//!
//! The alternate scheme appends a trailing `_` to the canonical name. It's used
//! as an intermediate renaming step so that no alternate name can clash with a
//! canonical one.
//!

use crate::symbols::{ALTERNATE_MARKER, NAME_MARKER};

///
/// Naming scheme for automaton states
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateNaming {
    /// `A`, `B`, ..., `Z`, `A'`, ...
    #[default]
    Canonical,
    /// `A_`, `B_`, ..., `Z_`, `A'_`, ...
    Alternate,
}

impl StateNaming {
    /// Name of the n-th state (starting from 0)
    pub fn name(self, n: usize) -> String {
        let letter = (b'A' + (n % 26) as u8) as char;
        let cycles = n / 26;
        let mut name = String::with_capacity(cycles + 2);
        name.push(letter);
        for _ in 0..cycles {
            name.push(NAME_MARKER);
        }
        if self == StateNaming::Alternate {
            name.push(ALTERNATE_MARKER);
        }
        name
    }

    /// Generator that produces the names of this scheme in order
    pub fn generator(self) -> StateNameGenerator {
        StateNameGenerator {
            naming: self,
            next: 0,
        }
    }
}

///
/// Sequential name generator
///
/// Each call to `next` returns the name of the next state in the scheme.
/// The generator is an explicit value: it must be created and passed
/// to the code that names states.
///
#[derive(Debug, Clone)]
pub struct StateNameGenerator {
    naming: StateNaming,
    next: usize,
}

impl StateNameGenerator {
    /// Number of names produced so far
    pub fn produced(&self) -> usize {
        self.next
    }
}

impl Iterator for StateNameGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = self.naming.name(self.next);
        self.next += 1;
        Some(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_canonical_names() {
        let n = StateNaming::default();
        assert_eq!(n, StateNaming::Canonical);
        assert_eq!(n.name(0), "A");
        assert_eq!(n.name(1), "B");
        assert_eq!(n.name(25), "Z");
        assert_eq!(n.name(26), "A'");
        assert_eq!(n.name(27), "B'");
        assert_eq!(n.name(52), "A''");
        assert_eq!(n.name(77), "Z''");
    }

    #[test]
    fn test_alternate_names() {
        let n = StateNaming::Alternate;
        assert_eq!(n.name(0), "A_");
        assert_eq!(n.name(26), "A'_");
    }

    #[test]
    fn test_generator() {
        let mut g = StateNaming::Canonical.generator();
        let names: Vec<String> = g.by_ref().take(28).collect();
        assert_eq!(names[0], "A");
        assert_eq!(names[27], "B'");
        assert_eq!(g.produced(), 28);
        assert_eq!(g.next().as_deref(), Some("C'"));
    }
}
