//! Expectation model: what the parser expected at a failure point
//!
//! An [`Expectation`] is a closed description of one thing the engine was
//! looking for when a match failed: a literal, a character class, any
//! character, end of input, or a free-form description supplied by a
//! rule. The furthest-failure state accumulates these, and
//! [`build_message`] renders the final human-readable diagnostic:
//!
//! ```text
//! Expected [^\n\r] or end of input but "\n" found.
//! ```
//!
//! Rendering escapes control characters so the message stays printable
//! (`\n`, `\t`, `\xHH` hex escapes and so on). Duplicate descriptions are
//! removed only here, at render time; the failure state itself keeps
//! every recorded expectation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One element of a character class: a single char or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassPart {
    Single(char),
    Range(char, char),
}

impl ClassPart {
    /// Whether `ch` is covered by this part (case-sensitive).
    pub fn contains(&self, ch: char) -> bool {
        match self {
            ClassPart::Single(c) => *c == ch,
            ClassPart::Range(lo, hi) => (*lo..=*hi).contains(&ch),
        }
    }
}

/// A single expected-input description recorded at a failure offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expectation {
    /// Exact text, optionally matched case-insensitively.
    Literal {
        text: String,
        case_insensitive: bool,
    },
    /// A character class, possibly inverted.
    Class {
        parts: Vec<ClassPart>,
        inverted: bool,
        case_insensitive: bool,
    },
    /// Any single character.
    Any,
    /// End of input.
    End,
    /// A free-form description raised by a semantic action.
    Other { description: String },
}

impl Expectation {
    pub fn literal(text: impl Into<String>, case_insensitive: bool) -> Self {
        Expectation::Literal {
            text: text.into(),
            case_insensitive,
        }
    }

    pub fn class(parts: Vec<ClassPart>, inverted: bool, case_insensitive: bool) -> Self {
        Expectation::Class {
            parts,
            inverted,
            case_insensitive,
        }
    }

    pub fn other(description: impl Into<String>) -> Self {
        Expectation::Other {
            description: description.into(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Literal { text, .. } => write!(f, "\"{}\"", literal_escape(text)),
            Expectation::Class {
                parts, inverted, ..
            } => {
                write!(f, "[")?;
                if *inverted {
                    write!(f, "^")?;
                }
                for part in parts {
                    match part {
                        ClassPart::Single(ch) => write!(f, "{}", class_escape_char(*ch))?,
                        ClassPart::Range(lo, hi) => write!(
                            f,
                            "{}-{}",
                            class_escape_char(*lo),
                            class_escape_char(*hi)
                        )?,
                    }
                }
                write!(f, "]")
            }
            Expectation::Any => write!(f, "any character"),
            Expectation::End => write!(f, "end of input"),
            Expectation::Other { description } => write!(f, "{}", description),
        }
    }
}

/// Escape a string for display inside a double-quoted literal.
pub fn literal_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => escape_common(ch, &mut out),
        }
    }
    out
}

/// Escape a character for display inside `[...]` class brackets.
fn class_escape_char(ch: char) -> String {
    let mut out = String::new();
    match ch {
        '\\' => out.push_str("\\\\"),
        ']' => out.push_str("\\]"),
        '^' => out.push_str("\\^"),
        '-' => out.push_str("\\-"),
        _ => escape_common(ch, &mut out),
    }
    out
}

/// Shared control-character escapes for both literal and class rendering.
fn escape_common(ch: char, out: &mut String) {
    match ch {
        '\0' => out.push_str("\\0"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        c if (c as u32) <= 0x0F => {
            out.push_str(&format!("\\x0{:X}", c as u32));
        }
        c if matches!(c as u32, 0x10..=0x1F | 0x7F..=0x9F) => {
            out.push_str(&format!("\\x{:X}", c as u32));
        }
        c => out.push(c),
    }
}

/// Render a set of expectations as a single phrase.
///
/// Descriptions are sorted lexically, deduplicated, then joined:
/// one stands alone, two become `A or B`, three or more become
/// `A, B, ..., or Z`.
pub fn describe_set(expected: &[Expectation]) -> String {
    let mut descriptions: Vec<String> = expected.iter().map(|e| e.to_string()).collect();
    descriptions.sort();
    descriptions.dedup();

    match descriptions.len() {
        0 => String::new(),
        1 => descriptions.remove(0),
        2 => format!("{} or {}", descriptions[0], descriptions[1]),
        n => format!(
            "{}, or {}",
            descriptions[..n - 1].join(", "),
            descriptions[n - 1]
        ),
    }
}

/// Render the token actually found at the failure point.
///
/// `None` (end of input, or an empty action span) renders as the phrase
/// "end of input"; anything else is quoted and escaped.
pub fn describe_found(found: Option<&str>) -> String {
    match found {
        Some(token) if !token.is_empty() => format!("\"{}\"", literal_escape(token)),
        _ => "end of input".to_string(),
    }
}

/// Build the top-level syntax error message.
pub fn build_message(expected: &[Expectation], found: Option<&str>) -> String {
    format!(
        "Expected {} but {} found.",
        describe_set(expected),
        describe_found(found)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rendering() {
        let exp = Expectation::literal("if", false);
        assert_eq!(exp.to_string(), "\"if\"");
    }

    #[test]
    fn test_literal_escapes() {
        let exp = Expectation::literal("a\"b\\c\nd\te\rf\0g", false);
        assert_eq!(exp.to_string(), "\"a\\\"b\\\\c\\nd\\te\\rf\\0g\"");
    }

    #[test]
    fn test_literal_hex_escapes() {
        // 0x01 uses the short form, 0x1F and 0x7F the long form
        let exp = Expectation::literal("\u{01}\u{1F}\u{7F}", false);
        assert_eq!(exp.to_string(), "\"\\x01\\x1F\\x7F\"");
    }

    #[test]
    fn test_class_rendering() {
        let exp = Expectation::class(
            vec![ClassPart::Single('\n'), ClassPart::Single('\r')],
            true,
            false,
        );
        assert_eq!(exp.to_string(), "[^\\n\\r]");
    }

    #[test]
    fn test_class_range_rendering() {
        let exp = Expectation::class(
            vec![ClassPart::Range('a', 'z'), ClassPart::Single('_')],
            false,
            false,
        );
        assert_eq!(exp.to_string(), "[a-z_]");
    }

    #[test]
    fn test_class_metacharacter_escapes() {
        let exp = Expectation::class(
            vec![
                ClassPart::Single(']'),
                ClassPart::Single('^'),
                ClassPart::Single('-'),
                ClassPart::Single('\\'),
            ],
            false,
            false,
        );
        assert_eq!(exp.to_string(), "[\\]\\^\\-\\\\]");
    }

    #[test]
    fn test_any_and_end_rendering() {
        assert_eq!(Expectation::Any.to_string(), "any character");
        assert_eq!(Expectation::End.to_string(), "end of input");
    }

    #[test]
    fn test_other_rendering_is_unescaped() {
        let exp = Expectation::other("a line of text\n(raw)");
        assert_eq!(exp.to_string(), "a line of text\n(raw)");
    }

    #[test]
    fn test_describe_set_single() {
        assert_eq!(describe_set(&[Expectation::Any]), "any character");
    }

    #[test]
    fn test_describe_set_two() {
        let set = [Expectation::literal("a", false), Expectation::End];
        // Sorted lexically: "\"a\"" < "end of input"
        assert_eq!(describe_set(&set), "\"a\" or end of input");
    }

    #[test]
    fn test_describe_set_three_or_more() {
        let set = [
            Expectation::literal("a", false),
            Expectation::literal("b", false),
            Expectation::literal("c", false),
        ];
        assert_eq!(describe_set(&set), "\"a\", \"b\", or \"c\"");
    }

    #[test]
    fn test_describe_set_sorts_and_dedups() {
        let set = [
            Expectation::literal("b", false),
            Expectation::literal("a", false),
            Expectation::literal("b", false),
        ];
        assert_eq!(describe_set(&set), "\"a\" or \"b\"");
    }

    #[test]
    fn test_describe_found() {
        assert_eq!(describe_found(Some("\n")), "\"\\n\"");
        assert_eq!(describe_found(None), "end of input");
        assert_eq!(describe_found(Some("")), "end of input");
    }

    #[test]
    fn test_build_message() {
        let expected = [
            Expectation::class(
                vec![ClassPart::Single('\n'), ClassPart::Single('\r')],
                true,
                false,
            ),
            Expectation::End,
        ];
        assert_eq!(
            build_message(&expected, Some("\n")),
            "Expected [^\\n\\r] or end of input but \"\\n\" found."
        );
    }

    #[test]
    fn test_class_part_contains() {
        assert!(ClassPart::Single('x').contains('x'));
        assert!(!ClassPart::Single('x').contains('y'));
        assert!(ClassPart::Range('a', 'z').contains('m'));
        assert!(!ClassPart::Range('a', 'z').contains('A'));
    }
}
