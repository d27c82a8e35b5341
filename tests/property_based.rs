// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests
//!
//! Random regular expressions over {a, b, &} are compared with a reference
//! backtracking matcher on all words of length at most 4. The automaton algebra
//! is checked on the automata of the same expressions, and on nondeterministic
//! variants of them that have dead branches and extra symbols.

use std::collections::BTreeSet;

use proptest::prelude::*;
use regular_languages::{automata::FiniteAutomaton, regular_expressions::Regex};

/// Abstract syntax of the generated expressions
#[derive(Debug, Clone)]
enum Re {
    Sym(char),
    Eps,
    Cat(Box<Re>, Box<Re>),
    Alt(Box<Re>, Box<Re>),
    Star(Box<Re>),
    Plus(Box<Re>),
    Opt(Box<Re>),
}

impl Re {
    /// Fully parenthesized text
    fn to_text(&self) -> String {
        match self {
            Re::Sym(c) => c.to_string(),
            Re::Eps => "&".to_string(),
            Re::Cat(x, y) => format!("({})({})", x.to_text(), y.to_text()),
            Re::Alt(x, y) => format!("(({})|({}))", x.to_text(), y.to_text()),
            Re::Star(x) => format!("({})*", x.to_text()),
            Re::Plus(x) => format!("({})+", x.to_text()),
            Re::Opt(x) => format!("({})?", x.to_text()),
        }
    }

    /// Positions j such that w[i..j] matches self
    fn ends(&self, w: &[char], i: usize) -> BTreeSet<usize> {
        match self {
            Re::Sym(c) => {
                if i < w.len() && w[i] == *c {
                    std::iter::once(i + 1).collect()
                } else {
                    BTreeSet::new()
                }
            }
            Re::Eps => std::iter::once(i).collect(),
            Re::Cat(x, y) => x
                .ends(w, i)
                .into_iter()
                .flat_map(|j| y.ends(w, j))
                .collect(),
            Re::Alt(x, y) => x.ends(w, i).union(&y.ends(w, i)).copied().collect(),
            Re::Star(x) => closure(x, w, std::iter::once(i).collect()),
            Re::Plus(x) => closure(x, w, x.ends(w, i)),
            Re::Opt(x) => {
                let mut result = x.ends(w, i);
                result.insert(i);
                result
            }
        }
    }

    fn matches(&self, word: &str) -> bool {
        let w: Vec<char> = word.chars().collect();
        self.ends(&w, 0).contains(&w.len())
    }
}

// all positions reachable from start by repeating x
fn closure(x: &Re, w: &[char], start: BTreeSet<usize>) -> BTreeSet<usize> {
    let mut reached = start.clone();
    let mut pending: Vec<usize> = start.into_iter().collect();
    while let Some(i) = pending.pop() {
        for j in x.ends(w, i) {
            if reached.insert(j) {
                pending.push(j);
            }
        }
    }
    reached
}

/// Strategy for generating expressions of depth at most 4
fn regex_strategy() -> impl Strategy<Value = Re> {
    let leaf = prop_oneof![Just(Re::Sym('a')), Just(Re::Sym('b')), Just(Re::Eps)];
    leaf.prop_recursive(4, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(x, y)| Re::Cat(Box::new(x), Box::new(y))),
            (inner.clone(), inner.clone()).prop_map(|(x, y)| Re::Alt(Box::new(x), Box::new(y))),
            inner.clone().prop_map(|x| Re::Star(Box::new(x))),
            inner.clone().prop_map(|x| Re::Plus(Box::new(x))),
            inner.prop_map(|x| Re::Opt(Box::new(x))),
        ]
    })
}

/// All words over {a, b} of length at most 4
fn words() -> Vec<String> {
    words_over(&['a', 'b'], 4)
}

/// All words over an alphabet up to a given length
fn words_over(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut result = vec![String::new()];
    let mut start = 0;
    for _ in 0..max_len {
        let end = result.len();
        for i in start..end {
            for c in alphabet.iter() {
                let w = format!("{}{}", result[i], c);
                result.push(w);
            }
        }
        start = end;
    }
    result
}

fn automaton(re: &Re) -> FiniteAutomaton {
    Regex::new(&re.to_text()).to_finite_automaton().unwrap()
}

/// Nondeterministic automaton for the same language as re
/// - a copy "q" of the initial state, reached wherever the initial state is
/// - a dead state "z" reached from the initial state on b and on c
fn nfa(re: &Re) -> FiniteAutomaton {
    let a = automaton(re);
    let mut nfa = a.clone();
    nfa.add_states(["q", "z"].iter().copied());
    if let Some(initial) = a.initial_state() {
        for (c, t) in a.successors(initial) {
            nfa.add_transition("q", c, t);
        }
        for (s, c, t) in a.transitions() {
            if t == initial {
                nfa.add_transition(s, c, "q");
            }
        }
        if a.is_accepting(initial) {
            nfa.accept_state("q");
        }
        nfa.add_transition(initial, 'b', "z");
        nfa.add_transition(initial, 'c', "z");
    }
    nfa
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The automaton of an expression accepts exactly the words that match it
    #[test]
    fn automaton_matches_reference(re in regex_strategy()) {
        let a = automaton(&re);
        prop_assert!(a.is_deterministic());
        for w in words() {
            prop_assert_eq!(a.accepts_word(&w), re.matches(&w), "word {:?} regex {}", w, re.to_text());
        }
    }

    /// Minimization preserves the language and is idempotent
    #[test]
    fn minimize_is_idempotent(re in regex_strategy()) {
        let a = automaton(&re);
        let m = a.minimize();
        prop_assert!(m.num_states() <= a.num_states());
        prop_assert_eq!(m.minimize().num_states(), m.num_states());
        for w in words() {
            prop_assert_eq!(m.accepts_word(&w), re.matches(&w));
        }
    }

    /// Determinization of a nondeterministic automaton preserves the language
    #[test]
    fn determinize_preserves_language(re in regex_strategy()) {
        let nfa = nfa(&re);
        let dfa = nfa.determinize();
        prop_assert!(dfa.is_deterministic());
        for w in words_over(&['a', 'b', 'c'], 3) {
            prop_assert_eq!(dfa.accepts_word(&w), re.matches(&w));
            prop_assert_eq!(nfa.accepts_word(&w), re.matches(&w));
        }
        prop_assert!(nfa.is_equivalent_to(&automaton(&re)));
    }

    /// The complement of an automaton with dead branches is taken over its whole alphabet
    #[test]
    fn nfa_complement(re in regex_strategy()) {
        let a = nfa(&re);
        let c = a.complement();
        let alphabet = a.alphabet();
        prop_assert_eq!(&c.alphabet(), &alphabet);
        let all = a.union(&c);
        for w in words_over(&['a', 'b', 'c'], 3) {
            if w.chars().all(|x| alphabet.contains(&x)) {
                prop_assert_eq!(c.accepts_word(&w), !re.matches(&w), "word {:?} regex {}", w, re.to_text());
                prop_assert!(all.accepts_word(&w));
            }
        }
        prop_assert!(a.intersection(&c).is_empty());
        prop_assert!(c.complement().is_equivalent_to(&a));
    }

    /// Products of automata with different alphabets agree with their operands
    #[test]
    fn nfa_products(x in regex_strategy(), y in regex_strategy()) {
        let a = nfa(&x);
        let b = automaton(&y).complement();
        let union = a.union(&b);
        let intersection = a.intersection(&b);
        let difference = b.difference(&a);
        for w in words_over(&['a', 'b', 'c'], 3) {
            let (p, q) = (a.accepts_word(&w), b.accepts_word(&w));
            prop_assert_eq!(union.accepts_word(&w), p || q, "word {:?}", w);
            prop_assert_eq!(intersection.accepts_word(&w), p && q, "word {:?}", w);
            prop_assert_eq!(difference.accepts_word(&w), q && !p, "word {:?}", w);
        }
        prop_assert!(union.contains(&a));
        prop_assert!(union.contains(&b));
        prop_assert!(a.contains(&intersection));
        prop_assert_eq!(a.contains(&b), difference.is_empty());
    }

    /// complement(complement(A)) is equivalent to A
    #[test]
    fn double_complement(re in regex_strategy()) {
        let a = automaton(&re);
        prop_assert!(a.complement().complement().is_equivalent_to(&a));
    }

    /// A ∩ A is equivalent to A, and A ∪ complement(A) accepts all words over the alphabet of A
    #[test]
    fn product_laws(re in regex_strategy()) {
        let a = automaton(&re);
        prop_assert!(a.intersection(&a).is_equivalent_to(&a));
        let all = a.union(&a.complement());
        let alphabet = a.alphabet();
        for w in words() {
            if w.chars().all(|c| alphabet.contains(&c)) {
                prop_assert!(all.accepts_word(&w));
            }
        }
    }

    /// Products agree with the reference matcher
    #[test]
    fn union_and_intersection(x in regex_strategy(), y in regex_strategy()) {
        let a = automaton(&x);
        let b = automaton(&y);
        let union = a.union(&b);
        let intersection = a.intersection(&b);
        for w in words() {
            prop_assert_eq!(union.accepts_word(&w), x.matches(&w) || y.matches(&w));
            prop_assert_eq!(intersection.accepts_word(&w), x.matches(&w) && y.matches(&w));
        }
        prop_assert!(a.union(&b).contains(&a));
        prop_assert!(a.contains(&intersection));
    }

    /// Automaton -> grammar -> automaton preserves the language
    #[test]
    fn grammar_round_trip(re in regex_strategy()) {
        let a = automaton(&re);
        if let Ok(g) = a.to_grammar() {
            let first = g.to_finite_automaton();
            let second = first.to_grammar().unwrap().to_finite_automaton();
            prop_assert!(second.is_equivalent_to(&first));
            prop_assert!(first.is_equivalent_to(&a));
            let reparsed = g.to_string().parse::<regular_languages::regular_grammars::RegularGrammar>();
            prop_assert_eq!(reparsed.as_ref(), Ok(&g));
        } else {
            prop_assert!(a.is_empty());
        }
    }

    /// Normalizing an expression doesn't change its language
    #[test]
    fn normalization_preserves_language(re in regex_strategy()) {
        let r = Regex::new(&re.to_text());
        let n = Regex::new(&r.normalize().unwrap());
        prop_assert!(r.is_equivalent_to(&n).unwrap());
    }
}

#[cfg(feature = "serde")]
#[test]
fn serde_round_trip() {
    let a = Regex::new("(a|b)*abb").to_finite_automaton().unwrap();
    let json = serde_json::to_string(&a).unwrap();
    println!("{json}");
    let b: FiniteAutomaton = serde_json::from_str(&json).unwrap();
    assert_eq!(a, b);
    assert!(b.accepts_word("babb"));
}
