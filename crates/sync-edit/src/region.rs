//! The tracked region and the document edits that move it.

use std::ops::Range;

/// A half-open character range `[start, end)` captured when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl Region {
    /// Create a region; the bounds are ordered if given reversed.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `true` if the region covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The region as a `Range`.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether the character at `offset` lies in the region.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether a caret at `offset` lies in the region.
    ///
    /// A caret sits between characters, so one sitting on the trailing edge is still inside.
    pub fn contains_caret(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Map the region through a document edit.
    ///
    /// Text inserted at either boundary is absorbed into the region; deletions that swallow a
    /// boundary pull it to the edit start.
    pub fn rebase(self, edit: &TextEdit) -> Region {
        Region {
            start: map_boundary(self.start, edit, true),
            end: map_boundary(self.end, edit, false),
        }
    }

    /// Map the region through edits applied in order.
    pub fn rebase_all<'a>(self, edits: impl IntoIterator<Item = &'a TextEdit>) -> Region {
        edits.into_iter().fold(self, |region, edit| region.rebase(edit))
    }
}

/// Map a word span through one edit. The flag is `true` when the edit touched the span
/// (overlapping it or sitting on either edge); such a span grows or shrinks with the edit.
pub(crate) fn rebase_span(span: Range<usize>, edit: &TextEdit) -> (Range<usize>, bool) {
    let touched = edit.start <= span.end && edit.end() >= span.start;
    let start = map_boundary(span.start, edit, true);
    let end = map_boundary(span.end, edit, false);
    (start..end.max(start), touched)
}

fn map_boundary(point: usize, edit: &TextEdit, stick_left: bool) -> usize {
    let start = edit.start;
    let end = edit.end();
    let inserted = edit.inserted_len();

    if point < start {
        point
    } else if point == start && start == end {
        if stick_left { point } else { point + inserted }
    } else if point < end {
        if stick_left { start } else { start + inserted }
    } else {
        point - (end - start) + inserted
    }
}

/// A single text edit expressed in character offsets.
///
/// `start` is an offset in the document **at the time this edit is applied**; a batch of edits
/// must be applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }
}
