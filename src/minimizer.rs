// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Minimization of complete deterministic finite-state automata
//!

use std::fmt::Display;

use log::trace;

use crate::{fast_sets::FastSet, partitions::Partition};

//
// The automaton is given by
// - a set of states S = [0 .. N-1]
// - an alphabet A = [0 .. M-1]
// - a total transition function delta: S x A -> S
// - a set of final states F
//
// Hopcroft's algorithm
// --------------------
// - start with the partition { F, S - F }
// - the worklist W initially contains F
// - while W is not empty:
//     pop a block B from W
//     for every c in A:
//       let X = pred(B, c) = { s in S | delta(s, c) is in B }
//       for every block D that intersects X but is not included in X:
//         split D into D1 = D inter X and D2 = D - X
//         if D is in W: replace it by D1 and D2
//         otherwise: add the smallest of D1 and D2 to W
//
// The elements of B are copied when B is popped since B itself may be
// split while it's being used.
//
// Predecessors are precomputed: pred[c][t] = { s | delta(s, c) = t }.
//

#[derive(Debug, Clone)]
pub struct Minimizer {
    num_states: u32,
    alphabet_size: u32,
    partition: Partition,
    // pred[c][t] = list of states s such that delta(s, c) = t
    pred: Vec<Vec<Vec<u32>>>,
    // blocks to process
    worklist: Vec<u32>,
    // pending[b] is true if block b is in the worklist
    pending: Vec<bool>,
}

impl Display for Minimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Minimizer: {} states, {} chars",
            self.num_states, self.alphabet_size
        )?;
        write!(f, "{}", self.partition)?;
        write!(f, "worklist:")?;
        for b in &self.worklist {
            write!(f, " {b}")?;
        }
        writeln!(f)
    }
}

impl Minimizer {
    ///
    /// Prepare the refinement of an automaton with num_states states,
    /// alphabet_size characters, transition function delta, and final
    /// states defined by is_final.
    ///
    pub fn new<D, F>(num_states: u32, alphabet_size: u32, delta: D, is_final: F) -> Self
    where
        D: Fn(u32, u32) -> u32,
        F: Fn(u32) -> bool,
    {
        let mut pred = vec![vec![Vec::new(); num_states as usize]; alphabet_size as usize];
        for s in 0..num_states {
            for c in 0..alphabet_size {
                let t = delta(s, c);
                pred[c as usize][t as usize].push(s);
            }
        }

        let mut partition = Partition::new(num_states);
        let mut worklist = Vec::new();
        let mut pending = vec![false; num_states as usize + 1];
        let all_states = partition.index().min(1);
        let (i, _) = partition.refine_block(all_states, &is_final);
        if i != 0 {
            // i = block of final states
            worklist.push(i);
            pending[i as usize] = true;
        }

        Minimizer {
            num_states,
            alphabet_size,
            partition,
            pred,
            worklist,
            pending,
        }
    }

    //
    // Collect the predecessors of the given states via character c
    //
    fn collect_predecessors(&self, splitter: &[u32], c: u32, pred_set: &mut FastSet) {
        pred_set.reset();
        let pred = &self.pred[c as usize];
        for &t in splitter {
            for &s in &pred[t as usize] {
                pred_set.insert(s);
            }
        }
    }

    //
    // Blocks with at least two elements that intersect pred_set
    //
    fn refinement_candidates(&self, pred_set: &FastSet, blocks: &mut FastSet) -> Vec<u32> {
        blocks.reset();
        for s in pred_set.iter() {
            let b = self.partition.block_id(s);
            if self.partition.block_size(b) > 1 {
                blocks.insert(b);
            }
        }
        blocks.iter().collect()
    }

    //
    // Split block d with pred_set and update the worklist
    //
    fn split(&mut self, d: u32, pred_set: &FastSet) {
        let (i, j) = self.partition.refine_block(d, |x| pred_set.contains(x));
        if i == 0 || j == 0 {
            return;
        }
        trace!("split block {d} into {i} and {j}");
        if self.pending[d as usize] {
            // d stays in the worklist and now stands for D1
            self.worklist.push(j);
            self.pending[j as usize] = true;
        } else {
            let smaller = if self.partition.smaller_block(i, j) { i } else { j };
            self.worklist.push(smaller);
            self.pending[smaller as usize] = true;
        }
    }

    ///
    /// Refine the partition until fix point and return it
    /// - two states are in the same block iff they are equivalent
    ///
    pub fn refine(&mut self) -> &Partition {
        let pred_set = &mut FastSet::new(self.num_states);
        let blocks = &mut FastSet::new(self.num_states + 1);
        while let Some(b) = self.worklist.pop() {
            self.pending[b as usize] = false;
            if self.partition.index() == self.num_states {
                // all blocks are singletons
                break;
            }
            let splitter: Vec<u32> = self.partition.block_elements(b).collect();
            for c in 0..self.alphabet_size {
                self.collect_predecessors(&splitter, c, pred_set);
                for d in self.refinement_candidates(pred_set, blocks) {
                    self.split(d, pred_set);
                }
            }
        }
        &self.partition
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // language abc(a*) over {a, b, c} = {0, 1, 2}
    // - states 3, 4, 5 are final and equivalent
    // - states 6, 7, 8 are sinks
    fn delta(s: u32, c: u32) -> u32 {
        match (s, c) {
            (0, 0) => 1,
            (1, 1) => 2,
            (2, 2) => 3,
            (3, 0) => 4,
            (4, 0) => 5,
            (5, 0) => 3,
            (0, _) | (4, _) => 6,
            (1, _) | (2, _) | (5, _) => 7,
            (3, _) => 8,
            (6, _) => 7,
            (7, _) => 8,
            _ => 6,
        }
    }

    fn is_final(s: u32) -> bool {
        (3..=5).contains(&s)
    }

    #[test]
    fn test_minimizer() {
        let mut minimizer = Minimizer::new(9, 3, delta, is_final);
        println!("{minimizer}");
        let p = minimizer.refine();
        println!("After refinement:\n{p}");

        // classes: {0}, {1}, {2}, {3, 4, 5}, {6, 7, 8}
        assert_eq!(p.index(), 5);
        assert_eq!(p.block_id(3), p.block_id(4));
        assert_eq!(p.block_id(3), p.block_id(5));
        assert_eq!(p.block_id(6), p.block_id(7));
        assert_eq!(p.block_id(6), p.block_id(8));
        assert_ne!(p.block_id(0), p.block_id(1));
        assert_ne!(p.block_id(1), p.block_id(2));
        assert_ne!(p.block_id(2), p.block_id(6));
    }

    #[test]
    fn test_no_final_state() {
        let mut minimizer = Minimizer::new(3, 1, |s, _| (s + 1) % 3, |_| false);
        let p = minimizer.refine();
        assert_eq!(p.index(), 1);
    }

    #[test]
    fn test_all_final() {
        let mut minimizer = Minimizer::new(3, 2, |s, c| (s + c) % 3, |_| true);
        let p = minimizer.refine();
        assert_eq!(p.index(), 1);
    }
}
