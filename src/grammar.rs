//! Grammar rules for paragraph segmentation
//!
//! The grammar, in PEG notation:
//!
//! ```text
//! start       = paragraph (newline paragraph)*
//! paragraph   = line+                         -> lines joined with "\n"
//! line        = $([^\n\r]+) end_of_line       -> the matched text
//! newline     = "\n" / "\r" "\n"?
//! end_of_line = newline / !.                  (!. consumes nothing)
//! ```
//!
//! A line requires at least one non-terminator character, so a blank line
//! always fails `line` and ends the current paragraph; the blank line's
//! own terminator is then consumed as the separating `newline` in
//! `start`. Each rule is all-or-nothing: on failure the cursor is back
//! where the rule started.

use crate::engine::ParserState;
use crate::expectation::ClassPart;

/// The character class of a line's body: anything but `\n` or `\r`.
const LINE_CHARS: [ClassPart; 2] = [ClassPart::Single('\n'), ClassPart::Single('\r')];

/// `start`: one or more paragraphs separated by single newlines.
pub fn start(st: &mut ParserState) -> Option<Vec<String>> {
    let head = paragraph(st)?;
    let mut paragraphs = vec![head];
    loop {
        let mark = st.mark();
        if newline(st).is_some() {
            if let Some(next) = paragraph(st) {
                paragraphs.push(next);
                continue;
            }
        }
        st.rewind(mark);
        break;
    }
    Some(paragraphs)
}

/// `paragraph`: one or more consecutive lines, joined with `\n`.
pub fn paragraph(st: &mut ParserState) -> Option<String> {
    let mut lines = vec![line(st)?];
    while let Some(next) = line(st) {
        lines.push(next);
    }
    Some(lines.join("\n"))
}

/// `line`: the text of one line, terminator excluded.
pub fn line(st: &mut ParserState) -> Option<String> {
    let begin = st.mark();
    text_char(st)?;
    while text_char(st).is_some() {}
    let text = st.slice(begin..st.mark());
    if end_of_line(st).is_none() {
        st.rewind(begin);
        return None;
    }
    Some(text)
}

/// One character of line body (`[^\n\r]`).
fn text_char(st: &mut ParserState) -> Option<char> {
    st.match_class(&LINE_CHARS, true, false)
}

/// `newline`: `\n`, or `\r` optionally followed by `\n`.
pub fn newline(st: &mut ParserState) -> Option<()> {
    if st.match_literal("\n", false).is_some() {
        return Some(());
    }
    if st.match_literal("\r", false).is_some() {
        let _ = st.match_literal("\n", false); // optional
        return Some(());
    }
    None
}

/// `end_of_line`: a real terminator, or a consume-nothing end-of-input
/// lookahead. The lookahead probes silently so its failure never shows
/// up as an expected token.
pub fn end_of_line(st: &mut ParserState) -> Option<()> {
    if newline(st).is_some() {
        return Some(());
    }
    let mark = st.mark();
    let probed = st.silently(|st| st.match_any());
    st.rewind(mark);
    if probed.is_none() {
        Some(())
    } else {
        None
    }
}
