//! The editor surface a session drives.
//!
//! A host owns the document, the native selection set and the rendering of highlights. The
//! session never stores editor state of its own beyond what it needs to recognise its own
//! writes coming back as selection events.

use crate::config::Rgba;
use crate::error::HostError;
use crate::position::{Position, Selection};
use crate::region::Region;
use std::ops::Range;

/// Identifies one editor surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EditorId(pub u32);

/// Opaque handle to a highlight created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HighlightHandle(pub u64);

/// Visual style of a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightStyle {
    /// Text colour override.
    pub foreground: Option<Rgba>,
    /// Background colour.
    pub background: Option<Rgba>,
}

impl HighlightStyle {
    /// A style that only recolours text.
    pub fn foreground(color: Rgba) -> Self {
        Self {
            foreground: Some(color),
            background: None,
        }
    }

    /// A style that only paints the background.
    pub fn background(color: Rgba) -> Self {
        Self {
            foreground: None,
            background: Some(color),
        }
    }
}

/// A change to an editor's selection set, pushed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChangeEvent {
    /// The editor whose selections changed.
    pub editor: EditorId,
    /// All selections, primary first.
    pub selections: Vec<Selection>,
}

impl SelectionChangeEvent {
    /// Create an event.
    pub fn new(editor: EditorId, selections: Vec<Selection>) -> Self {
        Self { editor, selections }
    }
}

/// Operations a session needs from the editor.
pub trait EditorHost {
    /// Identity of this editor surface.
    fn editor_id(&self) -> EditorId;

    /// Text covered by `region` (character offsets, clamped to the document).
    fn text(&self, region: Region) -> String;

    /// Convert a character offset into a logical position.
    fn offset_to_position(&self, offset: usize) -> Position;

    /// Convert a logical position into a character offset.
    fn position_to_offset(&self, position: Position) -> usize;

    /// Current selections, primary first.
    fn selections(&self) -> Vec<Selection>;

    /// The primary selection.
    fn active_selection(&self) -> Option<Selection> {
        self.selections().first().copied()
    }

    /// Replace the selection set. The first selection becomes primary.
    fn set_selections(&mut self, selections: Vec<Selection>) -> Result<(), HostError>;

    /// Allocate a highlight with the given style.
    fn create_highlight(&mut self, style: HighlightStyle) -> Result<HighlightHandle, HostError>;

    /// Replace the ranges painted by `handle`.
    fn apply_highlight(
        &mut self,
        handle: HighlightHandle,
        ranges: &[Range<usize>],
    ) -> Result<(), HostError>;

    /// Release a highlight.
    fn dispose_highlight(&mut self, handle: HighlightHandle) -> Result<(), HostError>;

    /// Show an informational message.
    fn show_message(&mut self, message: &str);

    /// `(anchor, caret)` of a selection as character offsets.
    fn selection_offsets(&self, selection: &Selection) -> (usize, usize) {
        (
            self.position_to_offset(selection.start),
            self.position_to_offset(selection.end),
        )
    }
}
