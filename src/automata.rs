// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Finite-state automata
//!
//! A [FiniteAutomaton] has named states, a transition relation that maps a state and
//! a symbol to an ordered list of target states, an optional initial state, a set of
//! accepting states, and a *current state* used for step-by-step simulation.
//! An automaton is deterministic if every transition list has at most one target.
//!
//! In-place edits (adding or removing states and transitions) mutate the automaton.
//! All algebraic operations ([determinize](FiniteAutomaton::determinize),
//! [minimize](FiniteAutomaton::minimize), [complement](FiniteAutomaton::complement),
//! [union](FiniteAutomaton::union), [intersection](FiniteAutomaton::intersection), ...)
//! return a new automaton and leave their operands unchanged.
//!
//! Several operations require a *complete* automaton, that is, one whose transition
//! function is total over its alphabet. They work on a copy completed with a
//! non-accepting sink state, named [SINK_STATE] as in
//! [materialize_error_state](FiniteAutomaton::materialize_error_state). Binary operations
//! complete both operands over the union of their alphabets.
//!
//! An [AutomatonBuilder] constructs an automaton from states of any hashable type.
//! States are named in creation order (see [naming](crate::naming)).
//!

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt::Display,
    hash::Hash,
};

use log::{debug, trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    bfs_queues::BfsQueue,
    errors::Error,
    minimizer::Minimizer,
    naming::StateNaming,
    regular_grammars::RegularGrammar,
    symbols::{ALTERNATE_MARKER, SINK_STATE},
};

///
/// Size of the language of an automaton
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageSize {
    /// No word is accepted
    Empty,
    /// Finitely many words are accepted
    Finite,
    /// Infinitely many words are accepted
    Infinite,
}

///
/// Finite-state automaton
///
// Invariants:
// - every state has an entry in transitions (possibly empty)
// - all states mentioned in transitions, accepting_states,
//   initial_state, and current_state are in states
// - transition lists are non-empty and have no duplicates
//
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FiniteAutomaton {
    states: Vec<String>,
    transitions: HashMap<String, BTreeMap<char, Vec<String>>>,
    initial_state: Option<String>,
    accepting_states: Vec<String>,
    current_state: Option<String>,
}

impl FiniteAutomaton {
    ///
    /// Create an automaton with no states
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// All states, in insertion order
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Initial state
    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    /// State reached by the simulation so far
    /// - None means that a symbol couldn't be matched
    pub fn current_state(&self) -> Option<&str> {
        self.current_state.as_deref()
    }

    /// Accepting states
    pub fn accepting_states(&self) -> &[String] {
        &self.accepting_states
    }

    /// Check whether state is in this automaton
    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Check whether state is accepting
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting_states.iter().any(|s| s == state)
    }

    fn index_of(&self, state: &str) -> Option<usize> {
        self.states.iter().position(|s| s == state)
    }

    ///
    /// Add a state
    /// - the first state added becomes the initial and current state
    /// - return false if the state already exists
    ///
    pub fn add_state(&mut self, state: &str) -> bool {
        if self.has_state(state) {
            return false;
        }
        self.states.push(state.to_string());
        self.transitions.insert(state.to_string(), BTreeMap::new());
        if self.initial_state.is_none() {
            self.initial_state = Some(state.to_string());
            self.current_state = Some(state.to_string());
        }
        true
    }

    ///
    /// Add several states
    ///
    pub fn add_states<'a>(&mut self, states: impl IntoIterator<Item = &'a str>) {
        for s in states {
            self.add_state(s);
        }
    }

    ///
    /// Remove a state and every transition from or to it
    /// - the state loses its initial, current, and accepting roles
    /// - return false if the state doesn't exist
    ///
    pub fn remove_state(&mut self, state: &str) -> bool {
        let i = match self.index_of(state) {
            Some(i) => i,
            None => return false,
        };
        self.states.remove(i);
        self.transitions.remove(state);
        for map in self.transitions.values_mut() {
            for targets in map.values_mut() {
                targets.retain(|t| t != state);
            }
            map.retain(|_, targets| !targets.is_empty());
        }
        self.accepting_states.retain(|s| s != state);
        if self.initial_state.as_deref() == Some(state) {
            self.initial_state = None;
        }
        if self.current_state.as_deref() == Some(state) {
            self.current_state = None;
        }
        true
    }

    ///
    /// Redirect every reference to state old to state new, then remove old
    /// - transitions into old now go to new
    /// - the outgoing transitions of old are discarded
    /// - new takes the initial and current roles of old
    ///
    /// This does nothing (except a warning) if old or new is missing or if they're equal.
    ///
    pub fn replace_state(&mut self, old: &str, new: &str) {
        if old == new || !self.has_state(old) || !self.has_state(new) {
            warn!("replace_state: can't replace {old} by {new}");
            return;
        }
        for map in self.transitions.values_mut() {
            for targets in map.values_mut() {
                if targets.iter().any(|t| t == old) {
                    let mut retargeted: Vec<String> = Vec::with_capacity(targets.len());
                    for t in targets.iter() {
                        let t = if t == old { new } else { t.as_str() };
                        if !retargeted.iter().any(|x| x == t) {
                            retargeted.push(t.to_string());
                        }
                    }
                    *targets = retargeted;
                }
            }
        }
        if self.initial_state.as_deref() == Some(old) {
            self.initial_state = Some(new.to_string());
        }
        if self.current_state.as_deref() == Some(old) {
            self.current_state = Some(new.to_string());
        }
        self.remove_state(old);
    }

    ///
    /// Make state accepting
    /// - soft failure: a missing state is ignored with a warning
    ///
    pub fn accept_state(&mut self, state: &str) {
        if !self.has_state(state) {
            warn!("accept_state: no state {state}");
        } else if !self.is_accepting(state) {
            self.accepting_states.push(state.to_string());
        }
    }

    ///
    /// Set the initial state
    /// - soft failure: a missing state is ignored with a warning
    ///
    pub fn set_initial_state(&mut self, state: &str) {
        if self.has_state(state) {
            self.initial_state = Some(state.to_string());
        } else {
            warn!("set_initial_state: no state {state}");
        }
    }

    ///
    /// Add a transition from --symbol--> to
    /// - soft failure: if from or to is missing, the transition is ignored with a warning
    ///
    pub fn add_transition(&mut self, from: &str, symbol: char, to: &str) {
        if !self.has_state(to) {
            warn!("add_transition: no state {to}");
            return;
        }
        match self.transitions.get_mut(from) {
            Some(map) => {
                let targets = map.entry(symbol).or_default();
                if !targets.iter().any(|t| t == to) {
                    targets.push(to.to_string());
                }
            }
            None => warn!("add_transition: no state {from}"),
        }
    }

    ///
    /// Targets of state on symbol (empty if there's no transition)
    ///
    pub fn targets(&self, state: &str, symbol: char) -> &[String] {
        self.transitions
            .get(state)
            .and_then(|map| map.get(&symbol))
            .map_or(&[], |v| v.as_slice())
    }

    ///
    /// Outgoing transitions of a state as (symbol, target) pairs, in increasing symbol order
    ///
    pub fn successors<'a>(&'a self, state: &str) -> impl Iterator<Item = (char, &'a str)> + 'a {
        self.transitions
            .get(state)
            .into_iter()
            .flat_map(|map| {
                map.iter()
                    .flat_map(|(c, targets)| targets.iter().map(move |t| (*c, t.as_str())))
            })
    }

    ///
    /// All transitions as triples (source, symbol, target)
    /// - sources in state order, then symbols in increasing order
    ///
    pub fn transitions(&self) -> impl Iterator<Item = (&str, char, &str)> + '_ {
        self.states.iter().flat_map(move |s| {
            self.successors(s)
                .map(move |(c, t)| (s.as_str(), c, t))
        })
    }

    ///
    /// Sorted list of all symbols that label a transition
    ///
    pub fn alphabet(&self) -> Vec<char> {
        let symbols: BTreeSet<char> = self
            .transitions
            .values()
            .flat_map(|map| map.keys().copied())
            .collect();
        symbols.into_iter().collect()
    }

    ///
    /// States that are not accepting
    ///
    pub fn rejecting_states(&self) -> Vec<String> {
        self.states
            .iter()
            .filter(|s| !self.is_accepting(s))
            .cloned()
            .collect()
    }

    ///
    /// Check whether every transition has a single target
    ///
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .values()
            .all(|map| map.values().all(|targets| targets.len() <= 1))
    }

    ///
    /// States with a transition on symbol to some state of set
    ///
    pub fn predecessors(&self, symbol: char, set: &[String]) -> Vec<String> {
        self.states
            .iter()
            .filter(|s| self.targets(s, symbol).iter().any(|t| set.contains(t)))
            .cloned()
            .collect()
    }

    //
    // Simulation
    //

    ///
    /// Move the current state along symbol
    /// - the first target is followed
    /// - if there's no transition, the current state becomes None and stays so until [reset](Self::reset)
    ///
    pub fn read_symbol(&mut self, symbol: char) {
        let next = match &self.current_state {
            Some(s) => self.targets(s, symbol).first().cloned(),
            None => None,
        };
        self.current_state = next;
    }

    ///
    /// Read all symbols of a word
    ///
    pub fn read(&mut self, word: &str) {
        for c in word.chars() {
            self.read_symbol(c);
        }
    }

    ///
    /// Restore the current state to the initial state
    ///
    pub fn reset(&mut self) {
        self.current_state = self.initial_state.clone();
    }

    ///
    /// Check whether the current state is accepting
    ///
    pub fn accepts(&self) -> bool {
        self.current_state
            .as_deref()
            .map_or(false, |s| self.is_accepting(s))
    }

    ///
    /// Check whether the automaton accepts a word
    ///
    /// This doesn't use or change the current state. All targets of nondeterministic
    /// transitions are followed.
    ///
    pub fn accepts_word(&self, word: &str) -> bool {
        let mut current: BTreeSet<&str> = self.initial_state.iter().map(|s| s.as_str()).collect();
        for c in word.chars() {
            current = current
                .iter()
                .flat_map(|s| self.targets(s, c).iter().map(|t| t.as_str()))
                .collect();
            if current.is_empty() {
                return false;
            }
        }
        current.iter().any(|s| self.is_accepting(s))
    }

    //
    // Reachability
    //

    ///
    /// States reachable from start (or from the initial state if start is None)
    /// - in breadth-first discovery order, start included
    /// - empty if start is not a state
    ///
    pub fn accessible_states(&self, start: Option<&str>) -> Vec<String> {
        let start = match start.or(self.initial_state.as_deref()) {
            Some(s) if self.has_state(s) => s,
            _ => return Vec::new(),
        };
        let mut queue = BfsQueue::from_roots(vec![start]);
        let mut result = Vec::new();
        while let Some(s) = queue.pop() {
            result.push(s.to_string());
            for (_, t) in self.successors(s) {
                queue.push(t);
            }
        }
        result
    }

    //
    // States from which an accepting state is reachable
    //
    fn live_states(&self) -> HashSet<String> {
        let mut reverse: HashMap<&str, Vec<&str>> = HashMap::new();
        for (s, _, t) in self.transitions() {
            reverse.entry(t).or_default().push(s);
        }
        let mut queue = BfsQueue::from_roots(self.accepting_states.iter().map(|s| s.as_str()));
        let mut live = HashSet::new();
        while let Some(s) = queue.pop() {
            live.insert(s.to_string());
            for &p in reverse.get(s).into_iter().flatten() {
                queue.push(p);
            }
        }
        live
    }

    fn retain_states(&mut self, keep: &HashSet<String>) {
        let removed: Vec<String> = self
            .states
            .iter()
            .filter(|s| !keep.contains(*s))
            .cloned()
            .collect();
        for s in &removed {
            self.remove_state(s);
        }
    }

    ///
    /// Remove the states from which no accepting state can be reached
    ///
    pub fn remove_dead_states(&mut self) {
        let live = self.live_states();
        self.retain_states(&live);
    }

    ///
    /// Remove the states that can't be reached from the initial state
    ///
    pub fn remove_inaccessible_states(&mut self) {
        let accessible: HashSet<String> = self.accessible_states(None).into_iter().collect();
        self.retain_states(&accessible);
    }

    ///
    /// Remove dead states then inaccessible states
    ///
    pub fn remove_useless_states(&mut self) {
        self.remove_dead_states();
        self.remove_inaccessible_states();
    }

    ///
    /// Rename all states using a naming scheme
    /// - the i-th state (in insertion order) gets the i-th name of the scheme
    ///
    pub fn rename_states(&mut self, naming: StateNaming) {
        let mapping: HashMap<String, String> =
            self.states.iter().cloned().zip(naming.generator()).collect();
        let rename = |s: &String| mapping.get(s).cloned().unwrap_or_else(|| s.clone());

        self.states = self.states.iter().map(rename).collect();
        self.transitions = self
            .transitions
            .iter()
            .map(|(s, map)| {
                let map: BTreeMap<char, Vec<String>> = map
                    .iter()
                    .map(|(c, targets)| (*c, targets.iter().map(rename).collect()))
                    .collect();
                (rename(s), map)
            })
            .collect();
        self.accepting_states = self.accepting_states.iter().map(rename).collect();
        self.initial_state = self.initial_state.as_ref().map(rename);
        self.current_state = self.current_state.as_ref().map(rename);
    }

    ///
    /// Make the transition function total
    /// - add the sink state [SINK_STATE] if it's not present
    /// - every missing transition on a symbol of the alphabet goes to the sink
    /// - the sink becomes the initial state if there's none
    ///
    pub fn materialize_error_state(&mut self) {
        let alphabet = self.alphabet();
        self.complete_over(&alphabet, SINK_STATE);
    }

    //
    // Send every missing transition on a symbol of alphabet to sink
    // - sink is added if it's not present
    //
    fn complete_over(&mut self, alphabet: &[char], sink: &str) {
        self.add_state(sink);
        for map in self.transitions.values_mut() {
            for &c in alphabet {
                map.entry(c).or_insert_with(|| vec![sink.to_string()]);
            }
        }
    }

    // non-accepting state whose transitions all loop back to it
    fn is_sink(&self, state: &str) -> bool {
        !self.is_accepting(state) && self.successors(state).all(|(_, t)| t == state)
    }

    //
    // Name of a non-accepting sink for this automaton
    // - [SINK_STATE] unless it's already used by a state that's not a sink
    //
    fn sink_name(&self) -> String {
        let mut name = SINK_STATE.to_string();
        while self.has_state(&name) && !self.is_sink(&name) {
            name.push(ALTERNATE_MARKER);
        }
        name
    }

    //
    // Dense transition table over alphabet: table[s * m + k] = first target of
    // states[s] on alphabet[k], or fallback if there's none.
    //
    fn dense_table(&self, alphabet: &[char], fallback: usize) -> Vec<usize> {
        let index: HashMap<&str, usize> = self
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();
        let mut table = Vec::with_capacity(self.states.len() * alphabet.len());
        for s in &self.states {
            for &c in alphabet {
                let next = self
                    .targets(s, c)
                    .first()
                    .and_then(|t| index.get(t.as_str()).copied())
                    .unwrap_or(fallback);
                table.push(next);
            }
        }
        table
    }

    //
    // Deterministic copy whose transition function is total over alphabet
    // - missing transitions go to a non-accepting sink
    // - return the copy and the index of its sink
    //
    fn completed(&self, alphabet: &[char]) -> (FiniteAutomaton, usize) {
        let mut result = if self.is_deterministic() {
            self.clone()
        } else {
            self.determinize()
        };
        let sink = result.sink_name();
        result.complete_over(alphabet, &sink);
        let index = result.index_of(&sink).unwrap_or(0);
        (result, index)
    }

    //
    // Algebra
    //

    ///
    /// Equivalent deterministic automaton
    ///
    /// A list of targets T1 ... Tk is replaced by a single merged state whose
    /// name is the concatenation of the names of T1 ... Tk (in the original state
    /// order). The merged state has the union of the transitions of T1 ... Tk and
    /// it's accepting if one of T1 ... Tk is. Merged states are processed in turn
    /// until no list has more than one target.
    ///
    /// Useless states are then removed and the states are renamed canonically.
    ///
    pub fn determinize(&self) -> FiniteAutomaton {
        let mut result = self.clone();
        // original states that make up each state of result
        let mut members: HashMap<String, Vec<usize>> = self
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), vec![i]))
            .collect();
        let mut merged_states: HashMap<Vec<usize>, String> = HashMap::new();

        let mut i = 0;
        while i < result.states.len() {
            let state = result.states[i].clone();
            let nondeterministic: Vec<(char, Vec<String>)> = result
                .transitions
                .get(&state)
                .into_iter()
                .flat_map(|map| map.iter())
                .filter(|(_, targets)| targets.len() > 1)
                .map(|(c, targets)| (*c, targets.clone()))
                .collect();

            for (c, targets) in nondeterministic {
                let mut group: Vec<usize> = targets
                    .iter()
                    .filter_map(|t| members.get(t))
                    .flatten()
                    .copied()
                    .collect();
                group.sort_unstable();
                group.dedup();

                let target = match merged_states.get(&group) {
                    Some(name) => name.clone(),
                    None if group.len() < 2 => match group.first() {
                        Some(&k) => self.states[k].clone(),
                        None => continue,
                    },
                    None => {
                        let name = self.merge_states(&group, &mut result);
                        trace!("determinize: {targets:?} merged into {name}");
                        merged_states.insert(group.clone(), name.clone());
                        members.insert(name.clone(), group);
                        name
                    }
                };
                if let Some(map) = result.transitions.get_mut(&state) {
                    map.insert(c, vec![target]);
                }
            }
            i += 1;
        }

        debug!(
            "determinize: {} states, {} after merging",
            self.num_states(),
            result.num_states()
        );
        result.remove_useless_states();
        result.rename_states(StateNaming::Canonical);
        result
    }

    //
    // Add to result the state obtained by merging the states of self with the given indices
    // - return the name of the new state
    //
    fn merge_states(&self, group: &[usize], result: &mut FiniteAutomaton) -> String {
        let mut name: String = group.iter().map(|&k| self.states[k].as_str()).collect();
        while result.has_state(&name) {
            name.push(ALTERNATE_MARKER);
        }

        let mut map: BTreeMap<char, Vec<String>> = BTreeMap::new();
        let mut accepting = false;
        for &k in group {
            let member = &self.states[k];
            accepting |= self.is_accepting(member);
            for (c, t) in self.successors(member) {
                let targets = map.entry(c).or_default();
                if !targets.iter().any(|x| x == t) {
                    targets.push(t.to_string());
                }
            }
        }

        result.states.push(name.clone());
        result.transitions.insert(name.clone(), map);
        if accepting {
            result.accepting_states.push(name.clone());
        }
        name
    }

    ///
    /// Minimal deterministic automaton that accepts the same language
    ///
    /// The result has no dead or inaccessible states and no synthetic sink.
    /// An automaton for the empty language minimizes to an automaton with no states.
    ///
    pub fn minimize(&self) -> FiniteAutomaton {
        let mut result = self.determinize();
        result.remove_equivalent_states();
        debug!(
            "minimize: {} states reduced to {}",
            self.num_states(),
            result.num_states()
        );
        result
    }

    //
    // Hopcroft minimization of a deterministic automaton with no useless states
    // - each class is collapsed into its member of lowest index
    //
    fn remove_equivalent_states(&mut self) {
        if self.states.is_empty() {
            return;
        }
        self.materialize_error_state();
        let alphabet = self.alphabet();
        let num_states = self.states.len();
        let sink = self.index_of(SINK_STATE).unwrap_or(num_states - 1);
        let table = self.dense_table(&alphabet, sink);
        let is_final: Vec<bool> = self.states.iter().map(|s| self.is_accepting(s)).collect();

        let m = alphabet.len();
        let delta = |s: u32, c: u32| table[s as usize * m + c as usize] as u32;
        let mut minimizer = Minimizer::new(
            num_states as u32,
            m as u32,
            delta,
            |s: u32| is_final[s as usize],
        );
        let partition = minimizer.refine();

        let mut merges = Vec::new();
        for s in 0..num_states as u32 {
            let rep = partition.representative(partition.block_id(s));
            if rep != s {
                merges.push((
                    self.states[s as usize].clone(),
                    self.states[rep as usize].clone(),
                ));
            }
        }
        for (old, rep) in &merges {
            self.replace_state(old, rep);
        }
        self.remove_state(SINK_STATE);
    }

    ///
    /// Automaton for the complement language (over the alphabet of self)
    ///
    /// The alphabet is taken before determinization, so symbols that only lead
    /// to dead states still belong to it. The result is deterministic and complete:
    /// it includes a sink state, named [SINK_STATE] unless that name is taken.
    ///
    pub fn complement(&self) -> FiniteAutomaton {
        let (mut result, _) = self.completed(&self.alphabet());
        result.accepting_states = result.rejecting_states();
        result
    }

    //
    // Product of two automata
    // - both operands are completed over the union of their alphabets, with
    //   a non-accepting sink, so each pair tracks what both operands do on a word
    // - the pair of initial states comes first, then all pairs in Cartesian order
    // - a pair is accepting if accept(left is accepting, right is accepting)
    //
    fn product<F>(&self, other: &FiniteAutomaton, accept: F) -> FiniteAutomaton
    where
        F: Fn(bool, bool) -> bool,
    {
        let alphabet: Vec<char> = self
            .alphabet()
            .into_iter()
            .chain(other.alphabet())
            .collect::<BTreeSet<char>>()
            .into_iter()
            .collect();
        let m = alphabet.len();
        let (left, left_sink) = self.completed(&alphabet);
        let (right, right_sink) = other.completed(&alphabet);

        let left_table = left.dense_table(&alphabet, left_sink);
        let right_table = right.dense_table(&alphabet, right_sink);
        let start = (
            left.initial_state().and_then(|s| left.index_of(s)).unwrap_or(left_sink),
            right.initial_state().and_then(|s| right.index_of(s)).unwrap_or(right_sink),
        );

        let mut builder = AutomatonBuilder::new(&start);
        for i in 0..left.num_states() {
            for j in 0..right.num_states() {
                builder.add_state(&(i, j));
            }
        }
        for i in 0..left.num_states() {
            for j in 0..right.num_states() {
                let pair = (i, j);
                if accept(
                    left.is_accepting(&left.states[i]),
                    right.is_accepting(&right.states[j]),
                ) {
                    builder.mark_final(&pair);
                }
                for (k, &c) in alphabet.iter().enumerate() {
                    let next = (left_table[i * m + k], right_table[j * m + k]);
                    builder.add_transition(&pair, c, &next);
                }
            }
        }
        debug!(
            "product: {} x {} states, {} pairs",
            left.num_states(),
            right.num_states(),
            builder.num_states()
        );
        builder.build(StateNaming::Canonical)
    }

    ///
    /// Automaton for the union of the two languages
    ///
    pub fn union(&self, other: &FiniteAutomaton) -> FiniteAutomaton {
        self.product(other, |a, b| a || b)
    }

    ///
    /// Automaton for the intersection of the two languages
    ///
    pub fn intersection(&self, other: &FiniteAutomaton) -> FiniteAutomaton {
        self.product(other, |a, b| a && b)
    }

    ///
    /// Automaton for the words accepted by self but not by other
    ///
    pub fn difference(&self, other: &FiniteAutomaton) -> FiniteAutomaton {
        self.product(other, |a, b| a && !b)
    }

    ///
    /// Check whether the language is empty
    ///
    pub fn is_empty(&self) -> bool {
        self.minimize().accepting_states.is_empty()
    }

    ///
    /// Check whether every word accepted by other is accepted by self
    ///
    /// `a.contains(&b)` is L(b) ⊆ L(a): the receiver is the larger language.
    /// It holds when `b.difference(&a)` is empty.
    ///
    pub fn contains(&self, other: &FiniteAutomaton) -> bool {
        other.difference(self).is_empty()
    }

    ///
    /// Check whether the two automata accept the same language
    ///
    pub fn is_equivalent_to(&self, other: &FiniteAutomaton) -> bool {
        self.contains(other) && other.contains(self)
    }

    ///
    /// Check whether the transition graph has a cycle through useful states
    ///
    /// Dead and inaccessible states are removed from a copy first, so this
    /// returns true iff the language is infinite.
    ///
    pub fn is_cyclic(&self) -> bool {
        let mut pruned = self.clone();
        pruned.remove_useless_states();

        let mut graph: HashMap<&str, HashSet<&str>> = pruned
            .states
            .iter()
            .map(|s| (s.as_str(), pruned.successors(s).map(|(_, t)| t).collect()))
            .collect();
        loop {
            let leaves: Vec<&str> = graph
                .iter()
                .filter(|(_, succ)| succ.is_empty())
                .map(|(s, _)| *s)
                .collect();
            if leaves.is_empty() {
                break;
            }
            for s in &leaves {
                graph.remove(s);
            }
            for succ in graph.values_mut() {
                for s in &leaves {
                    succ.remove(s);
                }
            }
        }
        !graph.is_empty()
    }

    ///
    /// Whether the language is empty, finite, or infinite
    ///
    pub fn language_size(&self) -> LanguageSize {
        let minimal = self.minimize();
        if minimal.accepting_states.is_empty() {
            LanguageSize::Empty
        } else if minimal.is_cyclic() {
            LanguageSize::Infinite
        } else {
            LanguageSize::Finite
        }
    }

    ///
    /// Right-linear grammar for the language of this automaton
    ///
    /// # Errors
    ///
    /// [Error::EmptyLanguage] if the automaton accepts no word.
    ///
    pub fn to_grammar(&self) -> Result<RegularGrammar, Error> {
        RegularGrammar::from_automaton(self)
    }
}

impl Display for FiniteAutomaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn plural(n: usize) -> &'static str {
            if n == 1 {
                ""
            } else {
                "s"
            }
        }
        fn or_none(s: Option<&str>) -> &str {
            s.unwrap_or("none")
        }

        let n = self.states.len();
        writeln!(f, "{} state{}: {}", n, plural(n), self.states.join(" "))?;
        writeln!(f, "initial state: {}", or_none(self.initial_state()))?;
        let k = self.accepting_states.len();
        writeln!(
            f,
            "accepting state{}: {}",
            plural(k),
            self.accepting_states.join(" ")
        )?;
        writeln!(f, "current state: {}", or_none(self.current_state()))?;
        writeln!(f, "transitions:")?;
        for s in &self.states {
            if let Some(map) = self.transitions.get(s) {
                for (c, targets) in map {
                    if targets.len() == 1 {
                        writeln!(f, "  \u{03B4}({s}, {c}) = {}", targets[0])?;
                    } else {
                        writeln!(f, "  \u{03B4}({s}, {c}) = {{{}}}", targets.join(", "))?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StateInConstruction {
    is_final: bool,
    transitions: BTreeMap<char, Vec<usize>>,
}

impl StateInConstruction {
    fn add_transition(&mut self, symbol: char, next_id: usize) {
        let targets = self.transitions.entry(symbol).or_default();
        if !targets.contains(&next_id) {
            targets.push(next_id);
        }
    }
}

///
/// Automaton builder
///
/// States are identified by values of type T. They're numbered in the order in which
/// they are first seen, starting with the initial state, and named accordingly
/// when the automaton is built.
///
#[derive(Debug)]
pub struct AutomatonBuilder<T> {
    id_map: HashMap<T, usize>,
    states: Vec<StateInConstruction>,
}

impl<T: Eq + Hash + Clone> AutomatonBuilder<T> {
    ///
    /// Create a new builder
    ///
    /// - initial_state = initial state for the resulting automaton
    ///
    pub fn new(initial_state: &T) -> Self {
        let mut new = AutomatonBuilder {
            id_map: HashMap::new(),
            states: Vec::new(),
        };
        new.add_state(initial_state);
        new
    }

    ///
    /// Register a state if it's new
    /// - return its index
    ///
    pub fn add_state(&mut self, state: &T) -> usize {
        match self.id_map.get(state) {
            Some(i) => *i,
            None => {
                let i = self.states.len();
                self.states.push(StateInConstruction::default());
                self.id_map.insert(state.clone(), i);
                i
            }
        }
    }

    /// Number of states registered so far
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    ///
    /// Mark a final state
    ///
    pub fn mark_final(&mut self, state: &T) -> &mut Self {
        let i = self.add_state(state);
        self.states[i].is_final = true;
        self
    }

    ///
    /// Add a transition
    ///
    pub fn add_transition(&mut self, state: &T, symbol: char, next: &T) -> &mut Self {
        let i = self.add_state(state);
        let j = self.add_state(next);
        self.states[i].add_transition(symbol, j);
        self
    }

    ///
    /// Construct the automaton
    /// - the i-th registered state gets the i-th name of the naming scheme
    ///
    pub fn build(&self, naming: StateNaming) -> FiniteAutomaton {
        let names: Vec<String> = naming.generator().take(self.states.len()).collect();
        let mut transitions = HashMap::with_capacity(names.len());
        let mut accepting_states = Vec::new();
        for (s, name) in self.states.iter().zip(&names) {
            let map = s
                .transitions
                .iter()
                .map(|(c, targets)| (*c, targets.iter().map(|&j| names[j].clone()).collect()))
                .collect();
            transitions.insert(name.clone(), map);
            if s.is_final {
                accepting_states.push(name.clone());
            }
        }
        let initial_state = names.first().cloned();
        FiniteAutomaton {
            current_state: initial_state.clone(),
            initial_state,
            accepting_states,
            transitions,
            states: names,
        }
    }
}
