// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Error codes
//!

use thiserror::Error;

///
/// Errors produced when parsing regular expressions and grammars,
/// or when converting between representations.
///
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A regular expression is rejected by validation or produces an
    /// invalid expression tree.
    #[error("invalid regular expression `{expression}`: {reason}")]
    InvalidRegex {
        /// The offending expression (whitespace removed)
        expression: String,
        /// Short description of the problem
        reason: &'static str,
    },

    /// A grammar line does not have the form `N -> alt | alt | ...`
    /// where each alternative is `&`, a terminal, or a terminal followed by a non-terminal.
    ///
    /// Lines are numbered from 1, blank lines excluded.
    #[error("invalid grammar: cannot parse line {line}: `{text}`")]
    InvalidProduction {
        /// Line number
        line: usize,
        /// Content of the line
        text: String,
    },

    /// No production was given, so the grammar has no initial symbol.
    #[error("invalid grammar: the initial symbol is undefined")]
    MissingInitialSymbol,

    /// Some non-terminals are used on the right-hand side of a production but
    /// have no production of their own.
    #[error("invalid grammar: the following symbols are undefined: {}", .0.join(", "))]
    UndefinedNonTerminals(Vec<String>),

    /// The automaton recognizes the empty language so it can't be written as
    /// a right-linear grammar.
    #[error("the automaton recognizes the empty language")]
    EmptyLanguage,
}

impl Error {
    pub(crate) fn invalid_regex(expression: &str, reason: &'static str) -> Self {
        Error::InvalidRegex {
            expression: expression.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_messages() {
        let e = Error::invalid_regex("a(", "unbalanced parentheses");
        assert_eq!(
            e.to_string(),
            "invalid regular expression `a(`: unbalanced parentheses"
        );

        let e = Error::UndefinedNonTerminals(vec!["A".to_string(), "B1".to_string()]);
        assert_eq!(
            e.to_string(),
            "invalid grammar: the following symbols are undefined: A, B1"
        );

        let e = Error::InvalidProduction {
            line: 2,
            text: "S ->".to_string(),
        };
        println!("{e}");
        assert!(e.to_string().contains("line 2"));
    }
}
