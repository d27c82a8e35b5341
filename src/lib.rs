// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Conversions and algebra between regular expressions, finite automata, and regular grammars
//!
//! # Overview
//!
//! This crate handles three equivalent representations of a regular language:
//! - textual regular expressions ([Regex](crate::regular_expressions::Regex)),
//! - finite-state automata, deterministic or not ([FiniteAutomaton](crate::automata::FiniteAutomaton)),
//! - right-linear grammars ([RegularGrammar](crate::regular_grammars::RegularGrammar)).
//!
//! A regular expression is converted to a deterministic automaton directly from its
//! threaded expression tree (see [expression_tree](crate::expression_tree)) using
//! De Simone's construction. Grammars and automata convert into each other.
//!
//! Module [automata](crate::automata) provides determinization, minimization,
//! complement, union, intersection, and emptiness, containment, equivalence, and
//! finiteness checks.
//!
//! Reserved symbols are defined in [symbols](crate::symbols) and state naming
//! schemes in [naming](crate::naming).
//!
//! # Example
//!
//! ```
//! use regular_languages::regular_expressions::Regex;
//! use regular_languages::regular_grammars::RegularGrammar;
//!
//! let a = Regex::new("a*b+c").to_finite_automaton().unwrap();
//! assert!(a.accepts_word("aabbbc"));
//! assert!(!a.accepts_word("abcc"));
//!
//! let g = RegularGrammar::parse("S -> a S | b A\nA -> b A | c").unwrap();
//! assert!(g.to_finite_automaton().is_equivalent_to(&a));
//! ```
//!

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod automata;
pub mod errors;
pub mod expression_tree;
pub mod naming;
pub mod regular_expressions;
pub mod regular_grammars;
pub mod symbols;

mod bfs_queues;
mod fast_sets;
mod minimizer;
mod partitions;
