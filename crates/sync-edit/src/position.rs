//! Logical positions and selections.
//!
//! Positions are host-facing coordinates (line + column in characters). The session itself
//! reasons in character offsets and only converts to positions through
//! [`EditorHost`](crate::host::EditorHost) when it talks to the editor.

use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Selection direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionDirection {
    /// Forward selection (anchor before caret)
    Forward,
    /// Backward selection (caret before anchor)
    Backward,
}

/// A caret/anchor pair.
///
/// `start` is the anchor (the fixed end) and `end` is the active caret. A selection with
/// `start == end` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Anchor position.
    pub start: Position,
    /// Active (caret) position.
    pub end: Position,
    /// Selection direction
    pub direction: SelectionDirection,
}

impl Selection {
    /// Build a selection from an anchor and a caret, deriving the direction.
    pub fn new(anchor: Position, caret: Position) -> Self {
        Self {
            start: anchor,
            end: caret,
            direction: selection_direction(anchor, caret),
        }
    }

    /// A collapsed selection (plain caret).
    pub fn caret(at: Position) -> Self {
        Self::new(at, at)
    }

    /// The anchor position.
    pub fn anchor(&self) -> Position {
        self.start
    }

    /// The active caret position.
    pub fn active(&self) -> Position {
        self.end
    }

    /// Returns `true` if no text is selected.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `(min, max)` of the two ends.
    pub fn min_max(&self) -> (Position, Position) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

/// Direction implied by an anchor/caret pair.
pub fn selection_direction(start: Position, end: Position) -> SelectionDirection {
    if start <= end {
        SelectionDirection::Forward
    } else {
        SelectionDirection::Backward
    }
}
