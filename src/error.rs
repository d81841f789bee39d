//! Error types for paragraph parsing
//!
//! Two layers: [`SyntaxError`] is the structured diagnostic carried by a
//! failed parse (message, expectation set, found token, location), and
//! [`ParseError`] is the public result error, which also covers the
//! configuration failure of naming an unregistered start rule.

use std::fmt;

use serde::Serialize;

use crate::expectation::{build_message, Expectation};
use crate::location::Location;

/// A structured syntax error describing why the input could not be parsed.
///
/// `expected` and `found` are populated for engine-raised failures
/// (furthest-failure reporting and the trailing-input check); both are
/// `None` for simple errors raised directly by a semantic action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub message: String,
    pub expected: Option<Vec<Expectation>>,
    pub found: Option<String>,
    pub location: Option<Location>,
}

impl SyntaxError {
    /// Build a structured error; the message is rendered from the
    /// expectation set and found token.
    pub fn structured(
        expected: Vec<Expectation>,
        found: Option<String>,
        location: Location,
    ) -> Self {
        let message = build_message(&expected, found.as_deref());
        Self {
            message,
            expected: Some(expected),
            found,
            location: Some(location),
        }
    }

    /// Build a simple error carrying only a caller-supplied message.
    pub fn simple(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            expected: None,
            found: None,
            location: Some(location),
        }
    }

    /// The error's stable name, for consumers that key on it.
    pub fn name(&self) -> &'static str {
        "SyntaxError"
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Errors returned by [`parse`](crate::parse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input could not be fully parsed.
    Syntax(SyntaxError),
    /// The requested start rule is not a registered entry point. Raised
    /// before any matching begins.
    UnknownStartRule(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax(err) => write!(f, "{}", err),
            ParseError::UnknownStartRule(name) => {
                write!(f, "Can't start parsing from rule \"{}\".", name)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Syntax(err) => Some(err),
            ParseError::UnknownStartRule(_) => None,
        }
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}
