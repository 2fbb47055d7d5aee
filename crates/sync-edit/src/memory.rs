//! In-memory editor host.
//!
//! [`MemoryEditor`] is a complete [`EditorHost`] over a [`ropey::Rope`]. It behaves like a
//! real editor surface in the one way that matters to a session: every selection write,
//! including the session's own, is reported back as a [`SelectionChangeEvent`]. Events queue
//! up until [`MemoryEditor::pump`] delivers them.
//!
//! User gestures (`click`, `select`, `type_text`, ...) mutate the document/selections the way
//! a multi-cursor editor would and queue the matching event.

use crate::error::{HostError, SyncEditError};
use crate::host::{EditorHost, EditorId, HighlightHandle, HighlightStyle, SelectionChangeEvent};
use crate::policy::CaretDecision;
use crate::position::{Position, Selection};
use crate::region::{Region, TextEdit};
use crate::session::SyncEditSession;
use ropey::Rope;
use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;

/// A highlight stored by [`MemoryEditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightEntry {
    /// Style given at creation.
    pub style: HighlightStyle,
    /// Ranges most recently applied.
    pub ranges: Vec<Range<usize>>,
}

/// An editor surface held entirely in memory.
#[derive(Debug)]
pub struct MemoryEditor {
    id: EditorId,
    rope: Rope,
    /// Primary first; never empty.
    selections: Vec<Selection>,
    events: VecDeque<SelectionChangeEvent>,
    highlights: BTreeMap<HighlightHandle, HighlightEntry>,
    next_handle: u64,
    messages: Vec<String>,
    refuse_dispose: bool,
}

impl MemoryEditor {
    /// Create an editor with the caret at the start of `text`.
    pub fn new(text: &str) -> Self {
        Self::with_id(text, EditorId(1))
    }

    /// Create an editor with an explicit id.
    pub fn with_id(text: &str, id: EditorId) -> Self {
        Self {
            id,
            rope: Rope::from_str(text),
            selections: vec![Selection::caret(Position::new(0, 0))],
            events: VecDeque::new(),
            highlights: BTreeMap::new(),
            next_handle: 1,
            messages: Vec::new(),
            refuse_dispose: false,
        }
    }

    /// Full document text.
    pub fn text_string(&self) -> String {
        self.rope.to_string()
    }

    /// Document length in characters.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of logical line `line`, without its line break.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let text = self.rope.line(line).to_string();
        let text = text.strip_suffix('\n').unwrap_or(&text);
        Some(text.strip_suffix('\r').unwrap_or(text).to_string())
    }

    /// Current selections as `(anchor, caret)` offsets, primary first.
    pub fn selection_offsets_all(&self) -> Vec<(usize, usize)> {
        self.selections
            .iter()
            .map(|s| self.selection_offsets(s))
            .collect()
    }

    /// Caret offset of the primary selection.
    pub fn primary_caret(&self) -> usize {
        self.selections
            .first()
            .map(|s| self.position_to_offset(s.end))
            .unwrap_or(0)
    }

    /// Highlights currently alive.
    pub fn highlights(&self) -> &BTreeMap<HighlightHandle, HighlightEntry> {
        &self.highlights
    }

    /// One highlight.
    pub fn highlight(&self, handle: HighlightHandle) -> Option<&HighlightEntry> {
        self.highlights.get(&handle)
    }

    /// Messages shown so far, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The most recent message.
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Make `dispose_highlight` fail (the handle stays alive).
    pub fn set_refuse_dispose(&mut self, refuse: bool) {
        self.refuse_dispose = refuse;
    }

    /// Selection events not yet delivered.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Remove and return all queued events.
    pub fn take_events(&mut self) -> Vec<SelectionChangeEvent> {
        self.events.drain(..).collect()
    }

    /// Deliver queued selection events to `session`, in order, until none remain.
    pub fn pump(
        &mut self,
        session: &mut SyncEditSession,
    ) -> Result<Vec<CaretDecision>, SyncEditError> {
        let mut decisions = Vec::new();
        while let Some(event) = self.events.pop_front() {
            decisions.push(session.on_selection_changed(self, &event)?);
        }
        Ok(decisions)
    }

    /// User gesture: place a single caret at `offset`.
    pub fn click(&mut self, offset: usize) {
        let position = self.offset_to_position(offset);
        self.replace_selections(vec![Selection::caret(position)]);
    }

    /// User gesture: select `anchor..caret`.
    pub fn select(&mut self, anchor: usize, caret: usize) {
        let selection = Selection::new(
            self.offset_to_position(anchor),
            self.offset_to_position(caret),
        );
        self.replace_selections(vec![selection]);
    }

    /// User gesture: set several `(anchor, caret)` selections, primary first.
    pub fn select_many(&mut self, ranges: &[(usize, usize)]) {
        let selections: Vec<Selection> = ranges
            .iter()
            .map(|&(anchor, caret)| {
                Selection::new(
                    self.offset_to_position(anchor),
                    self.offset_to_position(caret),
                )
            })
            .collect();
        if !selections.is_empty() {
            self.replace_selections(selections);
        }
    }

    /// User gesture: collapse every selection and move its caret by `delta` characters.
    pub fn move_carets(&mut self, delta: isize) {
        let len = self.char_count();
        let selections = self
            .selections
            .iter()
            .map(|s| {
                let caret = self.position_to_offset(s.end);
                let moved = caret.saturating_add_signed(delta).min(len);
                Selection::caret(self.offset_to_position(moved))
            })
            .collect();
        self.replace_selections(selections);
    }

    /// User gesture: drop every selection except the primary, collapsed to its caret.
    pub fn collapse_to_primary(&mut self) {
        let caret = self.selections[0].end;
        self.replace_selections(vec![Selection::caret(caret)]);
    }

    /// User gesture: type `text` at every caret, replacing selected text.
    ///
    /// Edits are computed against the original document and applied in descending offset
    /// order, so the returned edits are valid in application order. Each caret ends up after
    /// its inserted text.
    pub fn type_text(&mut self, text: &str) -> Vec<TextEdit> {
        self.edit_each(|start, end| (start, end, text.to_string()))
    }

    /// User gesture: delete the selection, or the character before each caret.
    pub fn backspace(&mut self) -> Vec<TextEdit> {
        self.edit_each(|start, end| {
            if start == end {
                (start.saturating_sub(1), end, String::new())
            } else {
                (start, end, String::new())
            }
        })
    }

    /// Type `text` and feed both the edits and the resulting selection events to `session`.
    pub fn type_into(
        &mut self,
        session: &mut SyncEditSession,
        text: &str,
    ) -> Result<Vec<CaretDecision>, SyncEditError> {
        let edits = self.type_text(text);
        session.on_text_changed(self, &edits)?;
        self.pump(session)
    }

    /// Backspace and feed both the edits and the resulting selection events to `session`.
    pub fn backspace_into(
        &mut self,
        session: &mut SyncEditSession,
    ) -> Result<Vec<CaretDecision>, SyncEditError> {
        let edits = self.backspace();
        session.on_text_changed(self, &edits)?;
        self.pump(session)
    }

    fn edit_each(
        &mut self,
        mut op: impl FnMut(usize, usize) -> (usize, usize, String),
    ) -> Vec<TextEdit> {
        struct Op {
            selection_index: usize,
            start: usize,
            delete_len: usize,
            insert: String,
            insert_len: usize,
        }

        let mut ops: Vec<Op> = Vec::with_capacity(self.selections.len());
        for (selection_index, selection) in self.selections.iter().enumerate() {
            let (min, max) = selection.min_max();
            let (start, end, insert) =
                op(self.position_to_offset(min), self.position_to_offset(max));
            let overlaps = ops
                .iter()
                .any(|other| start < other.start + other.delete_len && other.start < end);
            if overlaps || ops.iter().any(|other| other.start == start) {
                continue;
            }
            ops.push(Op {
                selection_index,
                start,
                delete_len: end - start,
                insert_len: insert.chars().count(),
                insert,
            });
        }

        // Final caret offsets in the post-edit document (ascending, accumulating the shift).
        let mut ascending: Vec<usize> = (0..ops.len()).collect();
        ascending.sort_by_key(|&idx| ops[idx].start);
        let mut carets: Vec<(usize, usize)> = Vec::with_capacity(ops.len());
        let mut shift: isize = 0;
        for &idx in &ascending {
            let op = &ops[idx];
            let start_after = op.start.saturating_add_signed(shift);
            carets.push((op.selection_index, start_after + op.insert_len));
            shift += op.insert_len as isize - op.delete_len as isize;
        }

        // Apply in descending order so earlier offsets stay valid.
        let mut edits = Vec::with_capacity(ops.len());
        for &idx in ascending.iter().rev() {
            let op = &ops[idx];
            let deleted_text = self
                .rope
                .slice(op.start..op.start + op.delete_len)
                .to_string();
            if op.delete_len > 0 {
                self.rope.remove(op.start..op.start + op.delete_len);
            }
            if !op.insert.is_empty() {
                self.rope.insert(op.start, &op.insert);
            }
            if deleted_text.is_empty() && op.insert.is_empty() {
                continue;
            }
            edits.push(TextEdit {
                start: op.start,
                deleted_text,
                inserted_text: op.insert.clone(),
            });
        }

        carets.sort_by_key(|&(selection_index, _)| selection_index);
        let selections = carets
            .into_iter()
            .map(|(_, caret)| Selection::caret(self.offset_to_position(caret)))
            .collect();
        self.replace_selections(selections);
        edits
    }

    fn replace_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
        self.events.push_back(SelectionChangeEvent::new(
            self.id,
            self.selections.clone(),
        ));
    }

    fn line_len(&self, line: usize) -> usize {
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }
}

impl EditorHost for MemoryEditor {
    fn editor_id(&self) -> EditorId {
        self.id
    }

    fn text(&self, region: Region) -> String {
        let len = self.rope.len_chars();
        let start = region.start.min(len);
        let end = region.end.min(len);
        self.rope.slice(start..end).to_string()
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    fn position_to_offset(&self, position: Position) -> usize {
        let last_line = self.rope.len_lines().saturating_sub(1);
        let line = position.line.min(last_line);
        self.rope.line_to_char(line) + position.column.min(self.line_len(line))
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) -> Result<(), HostError> {
        if selections.is_empty() {
            return Err(HostError::Other("selection set cannot be empty".to_string()));
        }
        self.replace_selections(selections);
        Ok(())
    }

    fn create_highlight(&mut self, style: HighlightStyle) -> Result<HighlightHandle, HostError> {
        let handle = HighlightHandle(self.next_handle);
        self.next_handle += 1;
        self.highlights.insert(
            handle,
            HighlightEntry {
                style,
                ranges: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn apply_highlight(
        &mut self,
        handle: HighlightHandle,
        ranges: &[Range<usize>],
    ) -> Result<(), HostError> {
        let len = self.rope.len_chars();
        if let Some(bad) = ranges.iter().find(|r| r.start > r.end || r.end > len) {
            return Err(HostError::InvalidRange {
                start: bad.start,
                end: bad.end,
            });
        }
        let entry = self
            .highlights
            .get_mut(&handle)
            .ok_or(HostError::UnknownHighlight(handle))?;
        entry.ranges = ranges.to_vec();
        Ok(())
    }

    fn dispose_highlight(&mut self, handle: HighlightHandle) -> Result<(), HostError> {
        if self.refuse_dispose {
            return Err(HostError::DisposeRefused(handle));
        }
        self.highlights
            .remove(&handle)
            .map(|_| ())
            .ok_or(HostError::UnknownHighlight(handle))
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
