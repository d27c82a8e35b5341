// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Regular expressions
//!
//! A [Regex] is written with terminals (see [symbols](crate::symbols)), the empty word `&`,
//! parentheses, and the operators
//! - `|` (alternation, lowest precedence)
//! - `.` (concatenation, usually implicit)
//! - `*`, `+`, `?` (postfix modifiers, highest precedence)
//!
//! For example, `(0|10*10*1)+` or `a(b|&)c*`. Whitespace is ignored.
//!
//! The automaton of a regular expression is built directly from its
//! [ExpressionTree] using De Simone's method: each state is a [Composition],
//! that is, the set of leaf positions that may match the next input symbol,
//! plus a flag that tells whether the end of the expression can be reached.
//! Compositions are obtained by walking the threaded tree with the traversal
//! programs of each [Operator](crate::symbols::Operator).
//!

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt::Display,
    str::FromStr,
};

use log::trace;

use crate::{
    automata::{AutomatonBuilder, FiniteAutomaton},
    bfs_queues::BfsQueue,
    errors::Error,
    expression_tree::{ExpressionTree, NodeData, NodeId},
    naming::StateNaming,
    symbols::{self, Direction, Move, Operator, CLOSE_GROUP, OPEN_GROUP},
};

///
/// Regular expression
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Regex {
    text: String,
}

///
/// Set of leaf positions reachable from some point of an expression tree
///
/// `reaches_end` is true if the end of the expression is reachable without
/// consuming any symbol.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Composition {
    positions: BTreeSet<usize>,
    reaches_end: bool,
}

impl Composition {
    /// Positions of the terminals in this composition
    pub fn positions(&self) -> &BTreeSet<usize> {
        &self.positions
    }

    /// Whether the end of the expression is reachable
    pub fn reaches_end(&self) -> bool {
        self.reaches_end
    }
}

impl Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for p in &self.positions {
            write!(f, " {p}")?;
        }
        if self.reaches_end {
            write!(f, " λ")?;
        }
        write!(f, " }}")
    }
}

//
// Walk of a threaded tree
// - visited records (node, direction) pairs so that nested closures terminate
// - pending holds the visits still to do, so the walk doesn't recurse
//
struct Traversal<'a> {
    tree: &'a ExpressionTree,
    visited: HashSet<(NodeId, Direction)>,
    pending: Vec<(Option<NodeId>, Direction)>,
    result: Composition,
}

impl<'a> Traversal<'a> {
    fn new(tree: &'a ExpressionTree) -> Self {
        Traversal {
            tree,
            visited: HashSet::new(),
            pending: Vec::new(),
            result: Composition::default(),
        }
    }

    // composition of the whole tree
    fn initial(tree: &'a ExpressionTree) -> Composition {
        let mut t = Traversal::new(tree);
        t.pending.push((Some(tree.root()), Direction::Down));
        t.run()
    }

    // composition reached after matching the given leaves
    fn after(tree: &'a ExpressionTree, leaves: &[NodeId]) -> Composition {
        let mut t = Traversal::new(tree);
        for &leaf in leaves {
            t.follow(leaf);
        }
        t.run()
    }

    fn run(mut self) -> Composition {
        while let Some((node, direction)) = self.pending.pop() {
            self.visit(node, direction);
        }
        self.result
    }

    fn visit(&mut self, node: Option<NodeId>, direction: Direction) {
        let id = match node {
            Some(id) => id,
            None => {
                if direction == Direction::Up {
                    self.result.reaches_end = true;
                }
                return;
            }
        };
        if !self.visited.insert((id, direction)) {
            return;
        }
        match self.tree.data(id) {
            NodeData::Terminal(_) if direction == Direction::Down => {
                if let Some(i) = self.tree.node(id).index() {
                    self.result.positions.insert(i);
                }
            }
            NodeData::Terminal(_) | NodeData::Epsilon => self.follow(id),
            NodeData::Operator(op) => self.expand(id, op, direction),
        }
    }

    // schedule the moves of the operator's program
    fn expand(&mut self, id: NodeId, op: Operator, direction: Direction) {
        let tree = self.tree;
        let node = tree.node(id);
        for step in op.program(direction) {
            match step {
                Move::Left => self.pending.push((node.left(), Direction::Down)),
                Move::Right => self.pending.push((node.right(), Direction::Down)),
                Move::Next => self.follow(id),
            }
        }
    }

    // continue after the subtree rooted at id
    fn follow(&mut self, id: NodeId) {
        let last = self.tree.rightmost(id);
        self.pending
            .push((self.tree.node(last).threading_link(), Direction::Up));
    }
}

impl Regex {
    ///
    /// Create a regular expression
    /// - whitespace is removed
    /// - the expression is not checked (see [validate](Self::validate))
    ///
    pub fn new(text: &str) -> Self {
        Regex {
            text: text.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    /// Text of the expression, without whitespace
    pub fn as_str(&self) -> &str {
        &self.text
    }

    ///
    /// Check whether the expression is well formed
    ///
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    ///
    /// Check the expression
    ///
    /// # Errors
    ///
    /// [Error::InvalidRegex] if the expression
    /// - is empty;
    /// - contains a character that's not a terminal, `&`, an operator, or a parenthesis;
    /// - has unbalanced parentheses;
    /// - has a binary operator or a closing parenthesis with no left operand
    ///   (e.g., `|a`, `a||b`, `(|a)`, `a.)`, `()`);
    /// - has a modifier that doesn't follow an operand or a group (e.g., `*a`, `a|*b`, `a??`);
    /// - ends with an operator or an open group.
    ///
    pub fn validate(&self) -> Result<(), Error> {
        let error = |reason| Err(Error::invalid_regex(&self.text, reason));
        if self.text.is_empty() {
            return error("empty expression");
        }

        // after_operand: previous symbol ends an operand (terminal, group, or modifier)
        // after_modifier: previous symbol is a modifier
        let mut depth = 0usize;
        let mut after_operand = false;
        let mut after_modifier = false;
        for c in self.text.chars() {
            if symbols::is_terminal_or_epsilon(c) {
                after_operand = true;
                after_modifier = false;
            } else if c == OPEN_GROUP {
                depth += 1;
                after_operand = false;
                after_modifier = false;
            } else if c == CLOSE_GROUP {
                if depth == 0 {
                    return error("unbalanced parentheses");
                }
                if !after_operand {
                    return error("missing operand before ')'");
                }
                depth -= 1;
                after_modifier = false;
            } else if let Some(op) = Operator::from_symbol(c) {
                if op.is_modifier() {
                    if !after_operand {
                        return error("modifier without operand");
                    }
                    if after_modifier {
                        return error("consecutive modifiers");
                    }
                    after_modifier = true;
                } else {
                    if !after_operand {
                        return error("missing left operand");
                    }
                    after_operand = false;
                    after_modifier = false;
                }
            } else {
                return error("invalid character");
            }
        }

        if depth > 0 {
            return error("unbalanced parentheses");
        }
        if !after_operand {
            return error("missing right operand");
        }
        Ok(())
    }

    ///
    /// Validate and make all concatenations explicit
    ///
    /// For example, `(a|b)c*` is normalized to `(a|b).c*`.
    ///
    pub fn normalize(&self) -> Result<String, Error> {
        self.validate()?;
        let concat = Operator::Concatenation.symbol();
        let mut result = String::with_capacity(2 * self.text.len());
        // no_dot: true at the start, after '(', and after '|'
        let mut no_dot = true;
        for c in self.text.chars() {
            if c == concat {
                continue;
            }
            let is_suffix = c == CLOSE_GROUP || symbols::is_operator(c);
            if !no_dot && !is_suffix {
                result.push(concat);
            }
            result.push(c);
            no_dot = c == OPEN_GROUP || c == Operator::Alternation.symbol();
        }
        Ok(result)
    }

    ///
    /// Build the expression tree of this expression
    ///
    pub fn to_expression_tree(&self) -> Result<ExpressionTree, Error> {
        ExpressionTree::parse(&self.normalize()?)
    }

    ///
    /// Construct a deterministic automaton for this expression
    ///
    /// States are compositions, discovered breadth-first with symbols in increasing
    /// order, and named canonically in discovery order. The initial state is the
    /// composition of the whole tree.
    ///
    pub fn to_finite_automaton(&self) -> Result<FiniteAutomaton, Error> {
        let tree = self.to_expression_tree()?;
        let mut leaf_at: HashMap<usize, (NodeId, char)> = HashMap::new();
        for leaf in tree.leaves() {
            if let (NodeData::Terminal(c), Some(i)) = (tree.data(leaf), tree.node(leaf).index()) {
                leaf_at.insert(i, (leaf, c));
            }
        }

        let start = Traversal::initial(&tree);
        let mut builder = AutomatonBuilder::new(&start);
        let mut queue = BfsQueue::from_roots(vec![start]);
        while let Some(composition) = queue.pop() {
            trace!("{}: composition {composition}", self.text);
            if composition.reaches_end {
                builder.mark_final(&composition);
            }
            let mut by_symbol: BTreeMap<char, Vec<NodeId>> = BTreeMap::new();
            for p in &composition.positions {
                if let Some(&(leaf, c)) = leaf_at.get(p) {
                    by_symbol.entry(c).or_default().push(leaf);
                }
            }
            for (c, leaves) in by_symbol {
                let next = Traversal::after(&tree, &leaves);
                builder.add_transition(&composition, c, &next);
                queue.push(next);
            }
        }
        Ok(builder.build(StateNaming::Canonical))
    }

    ///
    /// Check whether two expressions denote the same language
    ///
    pub fn is_equivalent_to(&self, other: &Regex) -> Result<bool, Error> {
        let a = self.to_finite_automaton()?;
        let b = other.to_finite_automaton()?;
        Ok(a.is_equivalent_to(&b))
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Parse and validate
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let regex = Regex::new(s);
        regex.validate()?;
        Ok(regex)
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn automaton(r: &str) -> FiniteAutomaton {
        Regex::new(r).to_finite_automaton().unwrap()
    }

    #[test]
    fn test_validation() {
        let valid = [
            "a",
            "9",
            "&",
            "a(b|c)",
            "(a|b)+(c|d)*e",
            "(ab|ac)*a?|(ba?c)*",
            "((a))",
            "a.b",
            "a * b",
        ];
        for r in valid.iter() {
            let regex = Regex::new(r);
            println!("{regex}: {:?}", regex.validate());
            assert!(regex.is_valid(), "{r} should be valid");
        }

        let invalid = [
            "", "a(", "a)", "a.", "a|", "a.|b", "a??", "a*+", "|a", "(|a)", "*a", "a|*b", "(*a)",
            "()", "a()", "a.)", "A", "a#(", ")a(",
        ];
        for r in invalid.iter() {
            let regex = Regex::new(r);
            println!("{r:?}: {:?}", regex.validate());
            assert!(!regex.is_valid(), "{r} should be invalid");
        }
        assert!("a||b".parse::<Regex>().is_err());
    }

    #[test]
    fn test_normalize() {
        let cases = [
            ("abc", "a.b.c"),
            ("abc|cde", "a.b.c|c.d.e"),
            ("(a|b)(c|d)", "(a|b).(c|d)"),
            ("(ab|bc)?(abc)*", "(a.b|b.c)?.(a.b.c)*"),
            ("(0|10*10*1)+", "(0|1.0*.1.0*.1)+"),
            ("a.b c", "a.b.c"),
            ("a*b+c", "a*.b+.c"),
        ];
        for (r, expected) in cases.iter() {
            let normalized = Regex::new(r).normalize().unwrap();
            println!("{r} --> {normalized}");
            assert_eq!(&normalized, expected);
        }
    }

    #[test]
    fn test_compositions() {
        let tree = Regex::new("(a|&)b").to_expression_tree().unwrap();
        let initial = Traversal::initial(&tree);
        println!("initial composition: {initial}");
        // leaves: a = 1, & = 2, b = 3
        assert_eq!(initial.positions().iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert!(!initial.reaches_end());

        let b = tree.node_at_position(3).unwrap();
        let last = Traversal::after(&tree, &[b]);
        assert!(last.positions().is_empty());
        assert!(last.reaches_end());

        // nested closures
        let tree = Regex::new("(a*)*").to_expression_tree().unwrap();
        let initial = Traversal::initial(&tree);
        assert!(initial.reaches_end());
        assert_eq!(initial.positions().len(), 1);
    }

    #[test]
    fn test_single_symbol() {
        let a = automaton("a");
        println!("{a}");
        assert_eq!(a.num_states(), 2);
        let initial = a.initial_state().unwrap();
        assert!(!a.is_accepting(initial));
        let next = &a.targets(initial, 'a')[0];
        assert!(a.is_accepting(next));
        assert_eq!(a.alphabet(), vec!['a']);
        assert!(a.targets(initial, 'b').is_empty());
    }

    #[test]
    fn test_acceptance() {
        let a = automaton("a*b+c");
        println!("{a}");
        assert!(a.is_deterministic());
        for w in ["bc", "aabbbc", "abc"].iter() {
            assert!(a.accepts_word(w), "{w} should be accepted");
        }
        for w in ["c", "abcc", "", "ac"].iter() {
            assert!(!a.accepts_word(w), "{w} should be rejected");
        }

        let mut a = automaton("(0|10*10*1)+");
        for w in ["0", "111", "1001000010", "01110"].iter() {
            a.reset();
            a.read(w);
            assert!(a.accepts(), "{w} should be accepted");
        }
        for w in ["", "1", "10", "0100"].iter() {
            assert!(!a.accepts_word(w), "{w} should be rejected");
        }

        let eps = automaton("&");
        assert_eq!(eps.num_states(), 1);
        assert!(eps.accepts_word(""));
        assert!(!eps.accepts_word("a"));

        let opt = automaton("a(b|&)c?");
        for w in ["a", "ab", "ac", "abc"].iter() {
            assert!(opt.accepts_word(w), "{w} should be accepted");
        }
        assert!(!opt.accepts_word("acb"));
    }

    #[test]
    fn test_intersection() {
        let star = automaton("a*");
        let single = automaton("a");
        let both = star.intersection(&single).minimize();
        println!("{both}");
        assert_eq!(both.num_states(), 2);
        assert!(both.is_equivalent_to(&single));
    }

    #[test]
    fn test_equivalence() {
        let r1 = Regex::new("(a|b)*");
        let r2 = Regex::new("(a*b*)*");
        let r3 = Regex::new("(ab)*");
        assert!(r1.is_equivalent_to(&r2).unwrap());
        assert!(!r1.is_equivalent_to(&r3).unwrap());
        assert!(r1.is_equivalent_to(&Regex::new("a(")).is_err());
    }

    #[test]
    fn test_long_expression() {
        let n = 20_000;
        let word = "a".repeat(n);
        let a = automaton(&word);
        assert_eq!(a.num_states(), n + 1);
        assert!(a.accepts_word(&word));
        assert!(!a.accepts_word(&word[1..]));
        assert!(!a.accepts_word(&format!("{word}a")));
    }
}
