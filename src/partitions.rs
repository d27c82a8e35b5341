// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Partitions of a set of states [0 ... n-1]
//!
//! A partition divides the states into disjoint blocks. Blocks are only ever
//! split, never merged, which is all partition refinement needs.
//!

use std::fmt::Display;

// Implementation:
// - segment[0 .. n-1] is a permutation of the n states
// - every block is a contiguous slice segment[start .. end]
// - block_id[x] is the id of the block that contains x
//
// Block 0 is the empty block. All other blocks are non-empty, so block
// ids 1 .. num_blocks-1 identify the equivalence classes.
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slice {
    start: usize,
    end: usize,
}

///
/// Partition of [0 .. n-1] into non-empty blocks
///
#[derive(Debug, Clone)]
pub struct Partition {
    blocks: Vec<Slice>,
    segment: Box<[u32]>,
    block_id: Box<[u32]>,
}

impl Partition {
    ///
    /// Create the partition of n elements with a single block
    /// - block 0 is empty
    /// - block 1 holds all elements if n > 0
    ///
    pub fn new(n: u32) -> Self {
        let size = n as usize;
        let segment: Box<[u32]> = (0..n).collect();
        let mut blocks = vec![Slice { start: 0, end: 0 }];
        if size > 0 {
            blocks.push(Slice {
                start: 0,
                end: size,
            });
        }
        Partition {
            blocks,
            segment,
            block_id: vec![1; size].into_boxed_slice(),
        }
    }

    ///
    /// Number of blocks, including the empty block 0
    ///
    pub fn num_blocks(&self) -> u32 {
        self.blocks.len() as u32
    }

    ///
    /// Number of equivalence classes (i.e., non-empty blocks)
    ///
    pub fn index(&self) -> u32 {
        self.num_blocks() - 1
    }

    ///
    /// Number of elements in block i
    ///
    pub fn block_size(&self, i: u32) -> u32 {
        let Slice { start, end } = self.blocks[i as usize];
        (end - start) as u32
    }

    ///
    /// Check whether block i has no more elements than block j
    ///
    pub fn smaller_block(&self, i: u32, j: u32) -> bool {
        self.block_size(i) <= self.block_size(j)
    }

    ///
    /// Block that contains x
    ///
    pub fn block_id(&self, x: u32) -> u32 {
        self.block_id[x as usize]
    }

    ///
    /// Elements of block i (in no particular order)
    ///
    pub fn block_elements(&self, i: u32) -> impl Iterator<Item = u32> + '_ {
        let Slice { start, end } = self.blocks[i as usize];
        self.segment[start..end].iter().copied()
    }

    ///
    /// Smallest element of block i
    /// - block i must not be empty
    ///
    pub fn representative(&self, i: u32) -> u32 {
        debug_assert!(i > 0 && self.block_size(i) > 0);
        self.block_elements(i).min().unwrap_or(0)
    }

    ///
    /// Split block i according to predicate p
    /// - B1 = { x in block i | p(x) } stays in block i
    /// - B2 = { x in block i | not p(x) } moves to a new block
    ///
    /// Return the pair of block ids (B1, B2), where 0 stands for an empty part:
    /// - (0, i) if no element satisfies p
    /// - (i, 0) if all elements satisfy p
    /// - (i, j) if the block was split and j is the new block
    ///
    pub fn refine_block<P>(&mut self, i: u32, p: P) -> (u32, u32)
    where
        P: Fn(u32) -> bool,
    {
        let Slice { start, end } = self.blocks[i as usize];
        let s = &mut self.segment[start..end];
        let mut k = 0;
        for j in 0..s.len() {
            if p(s[j]) {
                s.swap(j, k);
                k += 1;
            }
        }
        if k == 0 {
            (0, i)
        } else if k == s.len() {
            (i, 0)
        } else {
            let split_point = start + k;
            self.blocks[i as usize].end = split_point;
            let j = self.num_blocks();
            self.blocks.push(Slice {
                start: split_point,
                end,
            });
            for x in self.segment[split_point..end].iter() {
                self.block_id[*x as usize] = j;
            }
            (i, j)
        }
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 1..self.num_blocks() {
            write!(f, "block[{i}]:")?;
            let mut elements: Vec<u32> = self.block_elements(i).collect();
            elements.sort_unstable();
            for x in elements {
                write!(f, " {x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_refine() {
        let mut p = Partition::new(12);
        println!("Initial partition:\n{p}");
        assert_eq!(p.num_blocks(), 2);
        assert_eq!(p.index(), 1);

        // the empty block can't be split
        assert_eq!(p.refine_block(0, |x| x % 2 == 0), (0, 0));

        assert_eq!(p.refine_block(1, |x| x % 2 == 0), (1, 2));
        println!("Even/odd:\n{p}");
        for x in 0..12 {
            assert_eq!(p.block_id(x), if x % 2 == 0 { 1 } else { 2 });
        }

        // no split: every element of block 1 is even
        assert_eq!(p.refine_block(1, |x| x % 2 == 0), (1, 0));
        assert_eq!(p.refine_block(2, |x| x % 2 == 0), (0, 2));

        assert_eq!(p.refine_block(2, |x| x % 3 == 0), (2, 3));
        println!("Even/odd multiple of 3/other odd:\n{p}");
        assert_eq!(p.block_size(1), 6);
        assert_eq!(p.block_size(2), 2);
        assert_eq!(p.block_size(3), 4);
        assert!(p.smaller_block(2, 3));
        assert!(!p.smaller_block(1, 3));
        assert_eq!(p.representative(2), 3);
        assert_eq!(p.representative(3), 1);

        let mut odd_multiples: Vec<u32> = p.block_elements(2).collect();
        odd_multiples.sort_unstable();
        assert_eq!(odd_multiples, vec![3, 9]);
    }

    #[test]
    fn test_empty() {
        let p = Partition::new(0);
        assert_eq!(p.num_blocks(), 1);
        assert_eq!(p.index(), 0);
    }
}
