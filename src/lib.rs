//! # paraseg
//!
//! A backtracking recursive-descent parser that segments plain text into
//! paragraphs. A paragraph is one or more consecutive non-blank lines;
//! paragraphs are separated by a blank line. When the input cannot be
//! fully consumed, parsing fails with a structured [`SyntaxError`]
//! carrying the expectation set, the offending token, and its 1-based
//! line/column location.
//!
//! ```
//! let paragraphs = paraseg::parse("line1\nline2\n\nline3").unwrap();
//! assert_eq!(paragraphs, vec!["line1\nline2", "line3"]);
//!
//! let err = paraseg::parse("").unwrap_err();
//! assert!(err.to_string().ends_with("but end of input found."));
//! ```
//!
//! ## Modules
//!
//! - [`location`] - offset-to-line/column conversion with incremental caching
//! - [`expectation`] - the expectation model and diagnostic message rendering
//! - [`error`] - the structured [`SyntaxError`] and [`ParseError`] types
//! - [`engine`] - the backtracking engine ([`ParserState`]) and its match primitives
//! - [`grammar`] - the paragraph-segmentation rule set
//! - [`parser`] - the public [`parse`] entry points and start-rule registry
//!
//! The engine is fully reentrant: every parse owns its own cursor,
//! position cache, and failure state.

pub mod engine;
pub mod error;
pub mod expectation;
pub mod grammar;
pub mod location;
pub mod parser;

pub use engine::ParserState;
pub use error::{ParseError, SyntaxError};
pub use expectation::{ClassPart, Expectation};
pub use location::{Location, Position};
pub use parser::{parse, parse_with_options, ParseOptions};
