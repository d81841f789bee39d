//! Position and location tracking for parse diagnostics
//!
//! This module defines the data structures for representing positions and
//! spans in the input buffer, plus [`PositionCache`], the incremental
//! offset-to-line/column converter used by the parsing engine.
//!
//! ## How position tracking works
//!
//! The engine works on raw character offsets; line/column pairs are only
//! computed when a location is actually needed (building an error, or a
//! rule asking for the span it matched). Conversion is incremental:
//!
//! ```text
//! Input:  "ab\ncd"
//! Cache:  { 0 -> (1,1) }            seeded at parse start
//!
//! position_at(4):
//!   - nearest cached offset <= 4 is 0 at (1,1)
//!   - walk chars 0..4: 'a' col+1, 'b' col+1, '\n' line+1 col=1, 'c' col+1
//!   - cache 4 -> (2,2), return Position { offset: 4, line: 2, column: 2 }
//! ```
//!
//! Each computed offset is cached, so repeated conversions (common when
//! the same failure offset is reported several times) never rescan the
//! buffer. Cache entries are immutable once written.
//!
//! Lines are counted solely on `\n`; a lone `\r` advances the column like
//! any other character. Line and column are both 1-based.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in the input: raw char offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The span of a matched or failed construct (start and end positions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Incremental converter from char offsets to line/column positions.
///
/// Sparse: only offsets that were actually queried are cached. Scoped to
/// one parse invocation, like the rest of the engine state.
#[derive(Debug)]
pub struct PositionCache {
    entries: BTreeMap<usize, (usize, usize)>,
}

impl PositionCache {
    /// Create a cache seeded with offset 0 at line 1, column 1.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(0, (1, 1));
        Self { entries }
    }

    /// Convert `offset` to a [`Position`], walking forward from the
    /// nearest cached offset and caching the result.
    ///
    /// Callers must keep `offset` within `[0, chars.len()]`.
    pub fn position_at(&mut self, chars: &[char], offset: usize) -> Position {
        if let Some(&(line, column)) = self.entries.get(&offset) {
            return Position::new(offset, line, column);
        }

        // The seed entry at 0 guarantees this lookup succeeds.
        let (&base, &(mut line, mut column)) = self
            .entries
            .range(..offset)
            .next_back()
            .unwrap_or((&0, &(1, 1)));

        for &ch in &chars[base..offset] {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        self.entries.insert(offset, (line, column));
        Position::new(offset, line, column)
    }

    /// Convert a start/end offset pair to a [`Location`].
    pub fn location_of(&mut self, chars: &[char], start: usize, end: usize) -> Location {
        Location::new(
            self.position_at(chars, start),
            self.position_at(chars, end),
        )
    }
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new()
    }
}
