//! Backtracking engine: cursor, match primitives, and failure tracking
//!
//! [`ParserState`] owns all mutable state for one parse invocation: the
//! character buffer, the cursor, the position cache, the furthest-failure
//! record, and the silent counter. Grammar rules receive it by `&mut`
//! reference; nothing is process-global, so concurrent parses never share
//! state.
//!
//! Ordinary match failure is not an error: primitives return `None` as a
//! failure sentinel, and callers backtrack by rewinding the cursor to a
//! previously saved [`mark`](ParserState::mark). Raised errors are
//! reserved for the single unrecoverable top-level failure (built from
//! the furthest-failure record) and for explicit semantic-action
//! rejections.
//!
//! ## Furthest-failure rule
//!
//! Every non-silent primitive failure records what was expected at the
//! cursor. Failures behind the furthest offset reached so far are
//! discarded; a failure beyond it resets the set; failures at exactly the
//! furthest offset are appended. The final diagnostic therefore describes
//! the deepest point the parse ever reached, which is the most
//! informative place to report.

use std::ops::Range;

use crate::error::SyntaxError;
use crate::expectation::{ClassPart, Expectation};
use crate::location::{Location, Position, PositionCache};

/// All mutable state for a single parse invocation.
#[derive(Debug)]
pub struct ParserState {
    chars: Vec<char>,
    pos: usize,
    cache: PositionCache,
    furthest_offset: usize,
    furthest_expected: Vec<Expectation>,
    silent: usize,
}

impl ParserState {
    /// Create a fresh state over `input`. The cursor starts at offset 0.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            cache: PositionCache::new(),
            furthest_offset: 0,
            furthest_expected: Vec::new(),
            silent: 0,
        }
    }

    /// Input length in chars.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the cursor has consumed the entire input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Current cursor offset, usable later with [`rewind`](Self::rewind).
    pub fn mark(&self) -> usize {
        self.pos
    }

    /// Rewind the cursor to a previously saved mark (backtracking).
    pub fn rewind(&mut self, mark: usize) {
        debug_assert!(mark <= self.chars.len());
        self.pos = mark;
    }

    /// The character at the cursor, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// The text between two marks.
    pub fn slice(&self, range: Range<usize>) -> String {
        self.chars[range].iter().collect()
    }

    /// Consume `text` at the cursor, honoring the case-sensitivity flag.
    ///
    /// Returns the matched input text (which may differ from `text` in
    /// case when matching case-insensitively), or records a literal
    /// expectation and returns `None`.
    pub fn match_literal(&mut self, text: &str, case_insensitive: bool) -> Option<String> {
        let count = text.chars().count();
        let end = self.pos + count;
        if end <= self.chars.len() {
            let window: String = self.chars[self.pos..end].iter().collect();
            let matched = if case_insensitive {
                window.to_lowercase() == text.to_lowercase()
            } else {
                window == text
            };
            if matched {
                self.pos = end;
                return Some(window);
            }
        }
        self.fail_with(|| Expectation::literal(text, case_insensitive));
        None
    }

    /// Consume one character whose class membership equals `!inverted`.
    pub fn match_class(
        &mut self,
        parts: &[ClassPart],
        inverted: bool,
        case_insensitive: bool,
    ) -> Option<char> {
        if let Some(ch) = self.peek() {
            if class_contains(parts, ch, case_insensitive) != inverted {
                self.pos += 1;
                return Some(ch);
            }
        }
        self.fail_with(|| Expectation::class(parts.to_vec(), inverted, case_insensitive));
        None
    }

    /// Consume one character, failing only at end of input.
    pub fn match_any(&mut self) -> Option<char> {
        if let Some(ch) = self.peek() {
            self.pos += 1;
            return Some(ch);
        }
        self.fail_with(|| Expectation::Any);
        None
    }

    /// Run `probe` with failure recording suppressed.
    ///
    /// Used by lookahead constructs that intentionally test for input
    /// without their failures counting as real expected-token hints.
    pub fn silently<T>(&mut self, probe: impl FnOnce(&mut Self) -> T) -> T {
        self.silent += 1;
        let value = probe(self);
        self.silent -= 1;
        value
    }

    /// Record an expectation failure at the cursor, per the
    /// furthest-failure rule. No-op while in silent mode.
    ///
    /// The expectation is built lazily, only when it will be kept.
    pub fn fail_with(&mut self, expected: impl FnOnce() -> Expectation) {
        if self.silent > 0 || self.pos < self.furthest_offset {
            return;
        }
        if self.pos > self.furthest_offset {
            self.furthest_offset = self.pos;
            self.furthest_expected.clear();
        }
        self.furthest_expected.push(expected());
    }

    /// Line/column position of `offset`.
    pub fn position_at(&mut self, offset: usize) -> Position {
        self.cache.position_at(&self.chars, offset)
    }

    /// Location spanning `start..end`.
    pub fn location_of(&mut self, start: usize, end: usize) -> Location {
        self.cache.location_of(&self.chars, start, end)
    }

    /// Build the syntax error for the deepest recorded failure.
    ///
    /// The found token is the single character at the furthest offset, or
    /// `None` at end of input (where the location collapses to an empty
    /// span).
    pub fn furthest_failure(&mut self) -> SyntaxError {
        let offset = self.furthest_offset;
        let found = self.chars.get(offset).map(|ch| ch.to_string());
        let location = if offset < self.chars.len() {
            self.location_of(offset, offset + 1)
        } else {
            self.location_of(offset, offset)
        };
        SyntaxError::structured(self.furthest_expected.clone(), found, location)
    }

    /// Build the error a semantic action raises when it rejects an
    /// otherwise-valid match: "expected `description`", with the matched
    /// `span` as both the found token and the reported location.
    pub fn action_expected(&mut self, description: &str, span: Range<usize>) -> SyntaxError {
        let found = self.slice(span.clone());
        let location = self.location_of(span.start, span.end);
        let found = if found.is_empty() { None } else { Some(found) };
        SyntaxError::structured(vec![Expectation::other(description)], found, location)
    }

    /// Build a free-form semantic-action error over `span`.
    pub fn action_error(&mut self, message: &str, span: Range<usize>) -> SyntaxError {
        let location = self.location_of(span.start, span.end);
        SyntaxError::simple(message, location)
    }
}

/// Class membership test. Case-insensitive matching also tries the
/// character's simple lower/upper counterparts, so `[a-z]` matches `'A'`.
fn class_contains(parts: &[ClassPart], ch: char, case_insensitive: bool) -> bool {
    if parts.iter().any(|part| part.contains(ch)) {
        return true;
    }
    if case_insensitive {
        let folded = ch
            .to_lowercase()
            .chain(ch.to_uppercase())
            .filter(|&c| c != ch);
        for candidate in folded {
            if parts.iter().any(|part| part.contains(candidate)) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_literal_advances_cursor() {
        let mut st = ParserState::new("hello");
        assert_eq!(st.match_literal("hel", false), Some("hel".to_string()));
        assert_eq!(st.mark(), 3);
        assert_eq!(st.match_literal("lo", false), Some("lo".to_string()));
        assert!(st.at_end());
    }

    #[test]
    fn test_match_literal_failure_leaves_cursor() {
        let mut st = ParserState::new("hello");
        assert_eq!(st.match_literal("help", false), None);
        assert_eq!(st.mark(), 0);
    }

    #[test]
    fn test_match_literal_case_insensitive() {
        let mut st = ParserState::new("HeLLo");
        // Returns the input's own spelling
        assert_eq!(st.match_literal("hello", true), Some("HeLLo".to_string()));
    }

    #[test]
    fn test_match_class_inverted() {
        let parts = [ClassPart::Single('\n'), ClassPart::Single('\r')];
        let mut st = ParserState::new("a\n");
        assert_eq!(st.match_class(&parts, true, false), Some('a'));
        assert_eq!(st.match_class(&parts, true, false), None);
        assert_eq!(st.mark(), 1);
    }

    #[test]
    fn test_match_class_case_insensitive_range() {
        let parts = [ClassPart::Range('a', 'z')];
        let mut st = ParserState::new("Q");
        assert_eq!(st.match_class(&parts, false, true), Some('Q'));
    }

    #[test]
    fn test_match_any_fails_only_at_end() {
        let mut st = ParserState::new("x");
        assert_eq!(st.match_any(), Some('x'));
        assert_eq!(st.match_any(), None);
    }

    #[test]
    fn test_rewind_restores_cursor() {
        let mut st = ParserState::new("abc");
        let mark = st.mark();
        st.match_any();
        st.match_any();
        st.rewind(mark);
        assert_eq!(st.peek(), Some('a'));
    }

    #[test]
    fn test_furthest_failure_keeps_deepest_offset() {
        let mut st = ParserState::new("ab");
        st.match_any();
        st.match_literal("x", false); // fails at 1
        st.rewind(0);
        st.match_literal("y", false); // fails at 0: discarded
        let err = st.furthest_failure();
        assert_eq!(err.found.as_deref(), Some("b"));
        assert_eq!(
            err.expected,
            Some(vec![Expectation::literal("x", false)])
        );
    }

    #[test]
    fn test_failures_at_same_offset_accumulate() {
        let mut st = ParserState::new("z");
        st.match_literal("a", false);
        st.match_literal("b", false);
        let err = st.furthest_failure();
        assert_eq!(
            err.expected,
            Some(vec![
                Expectation::literal("a", false),
                Expectation::literal("b", false),
            ])
        );
    }

    #[test]
    fn test_deeper_failure_resets_the_set() {
        let mut st = ParserState::new("ab");
        st.match_literal("x", false); // at 0
        st.match_any();
        st.match_literal("y", false); // at 1: resets
        let err = st.furthest_failure();
        assert_eq!(
            err.expected,
            Some(vec![Expectation::literal("y", false)])
        );
    }

    #[test]
    fn test_silent_mode_suppresses_recording() {
        let mut st = ParserState::new("a");
        let probed = st.silently(|st| st.match_literal("b", false));
        assert_eq!(probed, None);
        let err = st.furthest_failure();
        assert_eq!(err.expected, Some(vec![]));
    }

    #[test]
    fn test_furthest_failure_at_end_of_input() {
        let mut st = ParserState::new("a");
        st.match_any();
        st.match_any(); // fails at end
        let err = st.furthest_failure();
        assert_eq!(err.found, None);
        assert_eq!(err.message, "Expected any character but end of input found.");
        let location = err.location.unwrap();
        assert_eq!(location.start.offset, 1);
        assert_eq!(location.end.offset, 1);
    }

    #[test]
    fn test_action_expected_uses_span_text() {
        let mut st = ParserState::new("word more");
        st.match_literal("word", false);
        let err = st.action_expected("a shorter word", 0..4);
        assert_eq!(err.message, "Expected a shorter word but \"word\" found.");
        assert_eq!(err.found.as_deref(), Some("word"));
        let location = err.location.unwrap();
        assert_eq!(location.start.offset, 0);
        assert_eq!(location.end.offset, 4);
    }

    #[test]
    fn test_action_expected_empty_span_reads_as_end_of_input() {
        let mut st = ParserState::new("x");
        let err = st.action_expected("something", 0..0);
        assert_eq!(err.message, "Expected something but end of input found.");
        assert_eq!(err.found, None);
    }

    #[test]
    fn test_action_error_is_simple() {
        let mut st = ParserState::new("abc");
        let err = st.action_error("rejected by rule", 0..3);
        assert_eq!(err.message, "rejected by rule");
        assert_eq!(err.expected, None);
        assert_eq!(err.found, None);
    }

    #[test]
    fn test_slice() {
        let st = ParserState::new("hello");
        assert_eq!(st.slice(1..4), "ell");
    }
}
