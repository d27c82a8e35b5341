// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Symbols, reserved characters, and regular-expression operators
//!
//! A *terminal* is a single character that can label a transition. It must not be
//! whitespace, an ASCII uppercase letter, the epsilon marker [EPSILON], a regular
//! expression operator, or a parenthesis.
//!
//! A *non-terminal* is an identifier made of an ASCII uppercase letter followed by
//! any number of ASCII digits or apostrophes (e.g., `S`, `S12`, `A''`). State names
//! produced by [StateNaming::Canonical](crate::naming::StateNaming::Canonical) are
//! valid non-terminals.
//!
//! Each [Operator] carries its arity, its precedence, and the two De Simone
//! traversal programs used to compute compositions (see
//! [regular_expressions](crate::regular_expressions)).
//!

use std::fmt::Display;

/// The empty word in regular expressions and grammars
pub const EPSILON: char = '&';

/// Name of the synthetic error state added when completing an automaton
pub const SINK_STATE: &str = "φ";

/// Priority added to every operator of a parenthesized group
pub const GROUP_PRIORITY_BOOST: u32 = 10;

/// Separator between the head and the body of a production
pub const PRODUCTION_ARROW: &str = "->";

/// Separator between the alternatives of a production
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// Suffix appended to state names: one per full cycle of 26 names, or
/// to derive a fresh state from an existing one
pub const NAME_MARKER: char = '\'';

/// Trailing marker of the alternate naming scheme
pub const ALTERNATE_MARKER: char = '_';

/// Opening parenthesis
pub const OPEN_GROUP: char = '(';

/// Closing parenthesis
pub const CLOSE_GROUP: char = ')';

///
/// Elementary moves of a De Simone traversal program
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Enter the left child (downward)
    Left,
    /// Enter the right child (downward)
    Right,
    /// Follow the threading link of the subtree (upward)
    Next,
}

///
/// Direction of a traversal step
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Entering a subtree
    Down,
    /// Leaving a subtree
    Up,
}

///
/// Regular expression operators
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// Binary `.`
    Concatenation,
    /// Binary `|`
    Alternation,
    /// Postfix `*`
    Star,
    /// Postfix `+`
    Plus,
    /// Postfix `?`
    Optional,
}

impl Operator {
    /// All operators
    pub const ALL: [Operator; 5] = [
        Operator::Concatenation,
        Operator::Alternation,
        Operator::Star,
        Operator::Plus,
        Operator::Optional,
    ];

    /// Operator denoted by a character, if any
    pub fn from_symbol(c: char) -> Option<Operator> {
        match c {
            '.' => Some(Operator::Concatenation),
            '|' => Some(Operator::Alternation),
            '*' => Some(Operator::Star),
            '+' => Some(Operator::Plus),
            '?' => Some(Operator::Optional),
            _ => None,
        }
    }

    /// Character for this operator
    pub fn symbol(self) -> char {
        match self {
            Operator::Concatenation => '.',
            Operator::Alternation => '|',
            Operator::Star => '*',
            Operator::Plus => '+',
            Operator::Optional => '?',
        }
    }

    /// Number of operands
    pub fn arity(self) -> usize {
        match self {
            Operator::Concatenation | Operator::Alternation => 2,
            Operator::Star | Operator::Plus | Operator::Optional => 1,
        }
    }

    /// Base precedence: a larger value binds tighter
    pub fn precedence(self) -> u32 {
        match self {
            Operator::Alternation => 1,
            Operator::Concatenation => 2,
            Operator::Star | Operator::Plus | Operator::Optional => 3,
        }
    }

    /// Check whether this is a postfix modifier (`*`, `+`, or `?`)
    pub fn is_modifier(self) -> bool {
        self.arity() == 1
    }

    ///
    /// Program used when entering a subtree rooted at this operator
    ///
    pub fn down_program(self) -> &'static [Move] {
        match self {
            Operator::Concatenation => &[Move::Left],
            Operator::Alternation => &[Move::Left, Move::Right],
            Operator::Star => &[Move::Left, Move::Next],
            Operator::Plus => &[Move::Left],
            Operator::Optional => &[Move::Left, Move::Next],
        }
    }

    ///
    /// Program used when coming back to this operator from its left operand
    ///
    pub fn up_program(self) -> &'static [Move] {
        match self {
            Operator::Concatenation => &[Move::Right],
            Operator::Alternation => &[Move::Next],
            Operator::Star => &[Move::Left, Move::Next],
            Operator::Plus => &[Move::Left, Move::Next],
            Operator::Optional => &[Move::Next],
        }
    }

    /// Program for a traversal direction
    pub fn program(self, direction: Direction) -> &'static [Move] {
        match direction {
            Direction::Down => self.down_program(),
            Direction::Up => self.up_program(),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Check whether c is a regular expression operator
pub fn is_operator(c: char) -> bool {
    Operator::from_symbol(c).is_some()
}

/// Check whether c is a parenthesis
pub fn is_parenthesis(c: char) -> bool {
    c == OPEN_GROUP || c == CLOSE_GROUP
}

/// Check whether c is a terminal symbol (epsilon excluded)
pub fn is_terminal(c: char) -> bool {
    !c.is_whitespace()
        && !c.is_control()
        && !c.is_ascii_uppercase()
        && c != EPSILON
        && !is_operator(c)
        && !is_parenthesis(c)
}

/// Check whether c is a terminal symbol or epsilon
pub fn is_terminal_or_epsilon(c: char) -> bool {
    c == EPSILON || is_terminal(c)
}

/// Check whether a string is a valid non-terminal identifier
pub fn is_non_terminal(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_digit() || c == NAME_MARKER),
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_operators() {
        for op in Operator::ALL {
            println!(
                "{}: arity {}, precedence {}, down {:?}, up {:?}",
                op,
                op.arity(),
                op.precedence(),
                op.down_program(),
                op.up_program()
            );
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
            assert_eq!(op.is_modifier(), op.precedence() == 3);
        }
        assert!(Operator::Alternation.precedence() < Operator::Concatenation.precedence());
        assert_eq!(Operator::from_symbol('a'), None);
    }

    #[test]
    fn test_classification() {
        for c in ['a', 'z', '0', '9', '#', '\''] {
            assert!(is_terminal(c), "{c} should be a terminal");
        }
        for c in ['A', 'S', '&', '|', '.', '*', '+', '?', '(', ')', ' ', '\n'] {
            assert!(!is_terminal(c), "{c:?} should not be a terminal");
        }
        assert!(is_terminal_or_epsilon(EPSILON));
        assert!(is_non_terminal("S"));
        assert!(is_non_terminal("S123"));
        assert!(is_non_terminal("A''"));
        assert!(is_non_terminal("B1'"));
        assert!(!is_non_terminal(""));
        assert!(!is_non_terminal("SA"));
        assert!(!is_non_terminal("Sx"));
        assert!(!is_non_terminal("x"));
        assert!(!is_non_terminal(SINK_STATE));
        assert!(!is_non_terminal("A_"));
    }
}
