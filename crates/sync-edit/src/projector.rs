//! Selection projector: occurrence offsets -> editor selections.

use crate::host::EditorHost;
use crate::index::OccurrenceGroup;
use crate::position::Selection;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Which edge of each occurrence receives the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaretPlacement {
    /// Anchor at the word start, caret at the word end (ready for suffix typing).
    #[default]
    TokenEnd,
    /// Anchor at the word end, caret at the word start.
    TokenStart,
}

/// One selection per occurrence of `group`, covering the whole word.
pub fn project<H: EditorHost + ?Sized>(
    group: &OccurrenceGroup,
    placement: CaretPlacement,
    host: &H,
) -> Vec<Selection> {
    group
        .spans()
        .map(|span| {
            let (anchor, caret) = match placement {
                CaretPlacement::TokenEnd => (span.start, span.end),
                CaretPlacement::TokenStart => (span.end, span.start),
            };
            Selection::new(host.offset_to_position(anchor), host.offset_to_position(caret))
        })
        .collect()
}

/// One collapsed caret per occurrence, `column` characters past each occurrence start.
pub fn project_carets<H: EditorHost + ?Sized>(
    group: &OccurrenceGroup,
    column: usize,
    host: &H,
) -> Vec<Selection> {
    group
        .offsets
        .iter()
        .map(|&o| Selection::caret(host.offset_to_position(o + column)))
        .collect()
}

/// Highlight ranges for the occurrences of `group`.
pub fn word_ranges(group: &OccurrenceGroup) -> Vec<Range<usize>> {
    group.spans().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEditor;
    use crate::position::Position;

    fn group() -> OccurrenceGroup {
        OccurrenceGroup {
            word: "ab".to_string(),
            offsets: vec![0, 5],
        }
    }

    #[test]
    fn test_project_token_end() {
        let editor = MemoryEditor::new("ab\nx ab");
        let selections = project(&group(), CaretPlacement::TokenEnd, &editor);
        assert_eq!(
            selections,
            vec![
                Selection::new(Position::new(0, 0), Position::new(0, 2)),
                Selection::new(Position::new(1, 2), Position::new(1, 4)),
            ]
        );
    }

    #[test]
    fn test_project_token_start_reverses_direction() {
        let editor = MemoryEditor::new("ab\nx ab");
        let selections = project(&group(), CaretPlacement::TokenStart, &editor);
        assert_eq!(selections[1].anchor(), Position::new(1, 4));
        assert_eq!(selections[1].active(), Position::new(1, 2));
    }

    #[test]
    fn test_project_carets_and_ranges() {
        let editor = MemoryEditor::new("ab\nx ab");
        let carets = project_carets(&group(), 1, &editor);
        assert_eq!(
            carets,
            vec![
                Selection::caret(Position::new(0, 1)),
                Selection::caret(Position::new(1, 3)),
            ]
        );
        assert_eq!(word_ranges(&group()), vec![0..2, 5..7]);
    }
}
