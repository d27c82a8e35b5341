// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Right-linear grammars
//!
//! A [RegularGrammar] is written one production per line:
//! ```text
//! S -> a S | b A | &
//! A -> a A | b
//! ```
//! - the head is a non-terminal (see [symbols](crate::symbols));
//! - tokens are separated by whitespace and the arrow `->` is a token of its own;
//! - each alternative is `&`, a terminal, or a terminal followed by a non-terminal.
//!
//! The head of the first line is the initial symbol. A non-terminal can be defined
//! on several lines; its alternatives are merged. Every non-terminal used in an
//! alternative must be defined.
//!

use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use crate::{
    automata::FiniteAutomaton,
    errors::Error,
    naming::StateNaming,
    symbols::{
        self, ALTERNATIVE_SEPARATOR, EPSILON, NAME_MARKER, PRODUCTION_ARROW,
    },
};

///
/// Right-hand side of a production
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Alternative {
    /// The empty word
    Epsilon,
    /// A single terminal
    Terminal(char),
    /// A terminal followed by a non-terminal
    Step(char, String),
}

impl Display for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alternative::Epsilon => write!(f, "{EPSILON}"),
            Alternative::Terminal(c) => write!(f, "{c}"),
            Alternative::Step(c, n) => write!(f, "{c} {n}"),
        }
    }
}

///
/// All alternatives of one non-terminal
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    head: String,
    alternatives: Vec<Alternative>,
}

impl Production {
    /// The non-terminal defined by this production
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Its alternatives in order of appearance
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.head, PRODUCTION_ARROW)?;
        for (i, alt) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, " {ALTERNATIVE_SEPARATOR}")?;
            }
            write!(f, " {alt}")?;
        }
        Ok(())
    }
}

///
/// Right-linear grammar
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegularGrammar {
    productions: Vec<Production>,
    initial_symbol: String,
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn parse_alternative(text: &str) -> Option<Alternative> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    match tokens.as_slice() {
        [t] => match single_char(t)? {
            EPSILON => Some(Alternative::Epsilon),
            c if symbols::is_terminal(c) => Some(Alternative::Terminal(c)),
            _ => None,
        },
        [t, n] => {
            let c = single_char(t)?;
            if symbols::is_terminal(c) && symbols::is_non_terminal(n) {
                Some(Alternative::Step(c, n.to_string()))
            } else {
                None
            }
        }
        _ => None,
    }
}

//
// Split a line into its head and alternatives
//
fn parse_line(line: &str) -> Option<(&str, Vec<Alternative>)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 || tokens[1] != PRODUCTION_ARROW || !symbols::is_non_terminal(tokens[0]) {
        return None;
    }
    let body = tokens[2..].join(" ");
    let alternatives = body
        .split(ALTERNATIVE_SEPARATOR)
        .map(parse_alternative)
        .collect::<Option<Vec<_>>>()?;
    Some((tokens[0], alternatives))
}

impl RegularGrammar {
    ///
    /// Parse and check a grammar
    ///
    /// # Errors
    ///
    /// - [Error::InvalidProduction] if a line is malformed. Line numbers count non-blank lines from 1.
    /// - [Error::MissingInitialSymbol] if there's no production.
    /// - [Error::UndefinedNonTerminals] if an alternative refers to a non-terminal without production.
    ///
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut productions: Vec<Production> = Vec::new();
        let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        for (i, line) in lines.enumerate() {
            let (head, alternatives) = parse_line(line).ok_or_else(|| Error::InvalidProduction {
                line: i + 1,
                text: line.to_string(),
            })?;
            match productions.iter_mut().find(|p| p.head == head) {
                Some(p) => {
                    for alt in alternatives {
                        if !p.alternatives.contains(&alt) {
                            p.alternatives.push(alt);
                        }
                    }
                }
                None => {
                    let mut unique = Vec::with_capacity(alternatives.len());
                    for alt in alternatives {
                        if !unique.contains(&alt) {
                            unique.push(alt);
                        }
                    }
                    productions.push(Production {
                        head: head.to_string(),
                        alternatives: unique,
                    });
                }
            }
        }

        let initial_symbol = match productions.first() {
            Some(p) => p.head.clone(),
            None => return Err(Error::MissingInitialSymbol),
        };
        let grammar = RegularGrammar {
            productions,
            initial_symbol,
        };
        grammar.check_consistency()?;
        Ok(grammar)
    }

    fn check_consistency(&self) -> Result<(), Error> {
        let undefined: BTreeSet<&str> = self
            .productions
            .iter()
            .flat_map(|p| p.alternatives.iter())
            .filter_map(|alt| match alt {
                Alternative::Step(_, n) if self.production(n).is_none() => Some(n.as_str()),
                _ => None,
            })
            .collect();
        if undefined.is_empty() {
            Ok(())
        } else {
            Err(Error::UndefinedNonTerminals(
                undefined.into_iter().map(String::from).collect(),
            ))
        }
    }

    /// Initial non-terminal
    pub fn initial_symbol(&self) -> &str {
        &self.initial_symbol
    }

    /// All productions, the initial one first
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Production of a non-terminal
    pub fn production(&self, head: &str) -> Option<&Production> {
        self.productions.iter().find(|p| p.head == head)
    }

    /// Defined non-terminals, in order of definition
    pub fn non_terminals(&self) -> Vec<&str> {
        self.productions.iter().map(|p| p.head.as_str()).collect()
    }

    /// Sorted list of the terminals used in the grammar
    pub fn terminals(&self) -> Vec<char> {
        let set: BTreeSet<char> = self
            .productions
            .iter()
            .flat_map(|p| p.alternatives.iter())
            .filter_map(|alt| match alt {
                Alternative::Terminal(c) | Alternative::Step(c, _) => Some(*c),
                Alternative::Epsilon => None,
            })
            .collect();
        set.into_iter().collect()
    }

    ///
    /// Automaton for this grammar
    ///
    /// There's a state per non-terminal. The initial state is the initial symbol.
    /// - `&` makes the state accepting
    /// - `a N` is a transition on a to N
    /// - the alternatives `a`, `b`, ... of N lead to a fresh accepting state (named
    ///   N followed by apostrophes) shared by all of them
    ///
    pub fn to_finite_automaton(&self) -> FiniteAutomaton {
        let mut automaton = FiniteAutomaton::new();
        automaton.add_state(&self.initial_symbol);
        for p in &self.productions {
            automaton.add_state(&p.head);
        }

        for p in &self.productions {
            let mut final_state: Option<String> = None;
            for alt in &p.alternatives {
                match alt {
                    Alternative::Epsilon => automaton.accept_state(&p.head),
                    Alternative::Step(c, n) => automaton.add_transition(&p.head, *c, n),
                    Alternative::Terminal(c) => {
                        if final_state.is_none() {
                            let mut name = p.head.clone();
                            name.push(NAME_MARKER);
                            while automaton.has_state(&name) {
                                name.push(NAME_MARKER);
                            }
                            automaton.add_state(&name);
                            automaton.accept_state(&name);
                            final_state = Some(name);
                        }
                        if let Some(t) = &final_state {
                            automaton.add_transition(&p.head, *c, t);
                        }
                    }
                }
            }
        }
        automaton
    }

    ///
    /// Grammar of an automaton
    ///
    /// Useless states are ignored. States are renamed canonically if some of their
    /// names are not valid non-terminals. Each transition `A --a--> B` becomes
    /// an alternative `a B` of A and each accepting state gets an `&` alternative.
    ///
    /// # Errors
    ///
    /// [Error::EmptyLanguage] if the automaton accepts nothing.
    ///
    pub fn from_automaton(automaton: &FiniteAutomaton) -> Result<Self, Error> {
        let mut a = automaton.clone();
        a.remove_useless_states();
        if !a.states().iter().all(|s| symbols::is_non_terminal(s)) {
            a.rename_states(StateNaming::Canonical);
        }
        let initial_symbol = match a.initial_state() {
            Some(s) if !a.accepting_states().is_empty() => s.to_string(),
            _ => return Err(Error::EmptyLanguage),
        };

        let mut heads = vec![initial_symbol.as_str()];
        heads.extend(
            a.states()
                .iter()
                .map(|s| s.as_str())
                .filter(|s| *s != initial_symbol),
        );
        let productions = heads
            .into_iter()
            .map(|head| {
                let mut alternatives: Vec<Alternative> = a
                    .successors(head)
                    .map(|(c, t)| Alternative::Step(c, t.to_string()))
                    .collect();
                if a.is_accepting(head) {
                    alternatives.push(Alternative::Epsilon);
                }
                Production {
                    head: head.to_string(),
                    alternatives,
                }
            })
            .collect();

        Ok(RegularGrammar {
            productions,
            initial_symbol,
        })
    }
}

impl FromStr for RegularGrammar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegularGrammar::parse(s)
    }
}

impl Display for RegularGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for p in &self.productions {
            writeln!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_valid() {
        let cases = [
            "S -> a S | &",
            "S -> b A | &\nA -> c",
            "S -> a A | b B | c C\nA -> a A | &\nB -> b B | d A\nC -> c C | &",
            "S123 -> b",
            "S736473843463743764734 -> &",
            "  S -> a|b S \n\n S -> c ",
            "A' -> 0 A' | 1",
        ];
        for text in cases.iter() {
            let g = RegularGrammar::parse(text);
            println!("{text:?}: {g:?}");
            assert!(g.is_ok(), "{text:?} should be valid");
        }
    }

    #[test]
    fn test_invalid() {
        let cases = [
            "S a S b &",
            "S >- a S b | &",
            "S-> a S b | &",
            "x -> a S b | &",
            "SA -> a S b | &",
            "Sx -> a S b | &",
            "S -> a | | b",
            "S -> SA",
            "S -> S'",
            "S -> Sx",
            "S -> C",
            "S -> ab",
            "S -> a S b",
            "CH4 + 2O2 -> CO2 + 2H2O",
            "I am not a grammar",
            "-> a S c",
            "S ->",
            "S -> ",
            "S - -> a",
            "S -> A a",
        ];
        for text in cases.iter() {
            let g = RegularGrammar::parse(text);
            println!("{text:?}: {g:?}");
            assert!(g.is_err(), "{text:?} should be invalid");
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            RegularGrammar::parse("S -> a S\n\nS ->> b"),
            Err(Error::InvalidProduction {
                line: 2,
                text: "S ->> b".to_string()
            })
        );
        assert_eq!(RegularGrammar::parse(" \n "), Err(Error::MissingInitialSymbol));
        assert_eq!(
            RegularGrammar::parse("S -> a B | b A | c B"),
            Err(Error::UndefinedNonTerminals(vec![
                "A".to_string(),
                "B".to_string()
            ]))
        );
    }

    #[test]
    fn test_accessors() {
        let g: RegularGrammar = "S -> b A | &\nA -> c | a S\nS -> b A".parse().unwrap();
        println!("{g}");
        assert_eq!(g.initial_symbol(), "S");
        assert_eq!(g.non_terminals(), vec!["S", "A"]);
        assert_eq!(g.terminals(), vec!['a', 'b', 'c']);
        assert_eq!(g.productions().len(), 2);
        assert_eq!(
            g.production("S").unwrap().alternatives(),
            [Alternative::Step('b', "A".to_string()), Alternative::Epsilon]
        );
        assert_eq!(g.to_string(), "S -> b A | &\nA -> c | a S\n");
        assert_eq!(g.to_string().parse::<RegularGrammar>().unwrap(), g);
    }

    #[test]
    fn test_self_loop() {
        let g = RegularGrammar::parse("S -> a S | &").unwrap();
        let a = g.to_finite_automaton();
        println!("{a}");
        assert_eq!(a.states(), ["S"]);
        assert_eq!(a.initial_state(), Some("S"));
        assert_eq!(a.accepting_states(), ["S"]);
        assert_eq!(a.targets("S", 'a'), ["S"]);
        assert!(a.minimize().is_cyclic());
    }

    #[test]
    fn test_terminal_alternatives() {
        let g = RegularGrammar::parse("S -> a | b | a S\nS' -> c").unwrap();
        let a = g.to_finite_automaton();
        println!("{a}");
        // S' is taken
        assert_eq!(a.states(), ["S", "S'", "S''", "S'''"]);
        assert_eq!(a.targets("S", 'a'), ["S''", "S"]);
        assert_eq!(a.targets("S", 'b'), ["S''"]);
        assert!(a.is_accepting("S''"));
        assert!(!a.is_accepting("S"));
        assert_eq!(a.targets("S'", 'c'), ["S'''"]);
        for w in ["a", "b", "aab"].iter() {
            assert!(a.accepts_word(w), "{w} should be accepted");
        }
        assert!(!a.accepts_word(""));
        assert!(!a.accepts_word("ba"));
    }

    #[test]
    fn test_round_trip() {
        let g = RegularGrammar::parse(
            "S -> a A | b B | c C\nA -> a A | &\nB -> b B | d A\nC -> c C | &",
        )
        .unwrap();
        let a = g.to_finite_automaton();
        let g2 = a.to_grammar().unwrap();
        println!("{g2}");
        assert_eq!(g2.initial_symbol(), "S");
        assert!(g2.to_finite_automaton().is_equivalent_to(&a));

        // a minimized automaton has canonical names
        let m = a.minimize();
        let g3 = m.to_grammar().unwrap();
        println!("{g3}");
        assert_eq!(g3.initial_symbol(), "A");
        assert!(g3.to_finite_automaton().is_equivalent_to(&a));
    }

    #[test]
    fn test_renamed_states() {
        let mut a = FiniteAutomaton::new();
        a.add_states(vec!["q0", "q1"]);
        a.add_transition("q0", 'x', "q1");
        a.accept_state("q1");
        let g = a.to_grammar().unwrap();
        assert_eq!(g.to_string(), "A -> x B\nB -> &\n");

        let mut empty = FiniteAutomaton::new();
        empty.add_state("S");
        assert_eq!(empty.to_grammar(), Err(Error::EmptyLanguage));
    }
}
