//! Public parse API and start-rule registry
//!
//! [`parse`] runs the grammar's designated start rule over the whole
//! input and returns the list of paragraphs, or a [`ParseError`]. The
//! optional start rule name in [`ParseOptions`] must be a registered
//! entry point; an unknown name fails before any matching begins.
//!
//! After the start rule succeeds the cursor must have reached the end of
//! input. Leftover input records an end-of-input expectation at the
//! cursor, and the overall furthest failure (which may be that one or a
//! deeper one recorded during matching) is what gets reported.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::engine::ParserState;
use crate::error::ParseError;
use crate::expectation::Expectation;
use crate::grammar;

/// A registered grammar entry point.
type StartRule = fn(&mut ParserState) -> Option<Vec<String>>;

/// The grammar's designated start rule.
pub const DEFAULT_START_RULE: &str = "start";

/// Registry of rules valid as parse entry points.
static START_RULES: Lazy<HashMap<&'static str, StartRule>> =
    Lazy::new(|| HashMap::from([(DEFAULT_START_RULE, grammar::start as StartRule)]));

/// Options for a parse invocation.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Name of the rule to start from; defaults to the grammar's
    /// designated start rule.
    pub start_rule: Option<String>,
}

/// Parse `input` into its paragraphs using the default start rule.
///
/// Each paragraph is a maximal run of non-blank lines, joined with
/// `\n`; paragraphs are separated by one blank line in the input.
///
/// # Example
///
/// ```
/// let paragraphs = paraseg::parse("Hello world.\n\nSecond paragraph.").unwrap();
/// assert_eq!(paragraphs, vec!["Hello world.", "Second paragraph."]);
/// ```
pub fn parse(input: &str) -> Result<Vec<String>, ParseError> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse `input` with explicit [`ParseOptions`].
pub fn parse_with_options(
    input: &str,
    options: ParseOptions,
) -> Result<Vec<String>, ParseError> {
    let name = options
        .start_rule
        .as_deref()
        .unwrap_or(DEFAULT_START_RULE);
    let rule = *START_RULES
        .get(name)
        .ok_or_else(|| ParseError::UnknownStartRule(name.to_string()))?;

    let mut state = ParserState::new(input);
    let result = rule(&mut state);
    complete(state, result)
}

/// Apply the end-of-input post-condition and build the final result.
///
/// A successful rule with trailing input is still a failed parse: an
/// `End` expectation is recorded at the cursor (subject to the
/// furthest-failure rule) and the deepest failure is reported.
fn complete(
    mut state: ParserState,
    result: Option<Vec<String>>,
) -> Result<Vec<String>, ParseError> {
    match result {
        Some(value) if state.at_end() => Ok(value),
        result => {
            if result.is_some() {
                state.fail_with(|| Expectation::End);
            }
            Err(ParseError::Syntax(state.furthest_failure()))
        }
    }
}
