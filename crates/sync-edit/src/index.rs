//! Occurrence index: groups repeated tokens.
//!
//! Groups keep first-appearance order (the order a reader meets each word scanning left to
//! right), and only words that occur at least twice survive.

use crate::region::{TextEdit, rebase_span};
use crate::tokenizer::{Token, WordClass, scan_with};
use std::collections::HashMap;
use std::ops::Range;

/// All occurrences of one repeated word.
///
/// Invariants: `word` is non-empty, `offsets.len() >= 2`, offsets strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceGroup {
    /// The repeated word.
    pub word: String,
    /// Document-space character offsets of each occurrence, in document order.
    pub offsets: Vec<usize>,
}

impl OccurrenceGroup {
    /// Length of the word in characters.
    pub fn word_len(&self) -> usize {
        self.word.chars().count()
    }

    /// Number of occurrences.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always `false` for groups produced by [`index`].
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Half-open character ranges covered by each occurrence.
    pub fn spans(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let len = self.word_len();
        self.offsets.iter().map(move |&o| o..o + len)
    }

    /// Index of the occurrence whose span touches `offset` (both edges inclusive).
    pub fn occurrence_at(&self, offset: usize) -> Option<usize> {
        let len = self.word_len();
        // Offsets are sorted: only the last occurrence starting at or before `offset` can match.
        let idx = self.offsets.partition_point(|&o| o <= offset).checked_sub(1)?;
        (offset <= self.offsets[idx] + len).then_some(idx)
    }

    /// Each occurrence's span moved through `edits` (in application order), flagged `true`
    /// when any edit touched it.
    pub(crate) fn rebased_spans(&self, edits: &[TextEdit]) -> Vec<(Range<usize>, bool)> {
        self.spans()
            .map(|span| {
                edits.iter().fold((span, false), |(span, touched), edit| {
                    let (span, hit) = rebase_span(span, edit);
                    (span, touched || hit)
                })
            })
            .collect()
    }
}

/// Repeated-word groups in first-appearance order. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupList {
    groups: Vec<OccurrenceGroup>,
}

impl GroupList {
    /// Build a list from groups whose offsets moved after an edit.
    ///
    /// Groups with the same word are merged, offsets are sorted and deduplicated, words left
    /// with fewer than two occurrences are dropped, and groups are ordered by first offset.
    pub(crate) fn from_groups(groups: impl IntoIterator<Item = OccurrenceGroup>) -> Self {
        let mut merged: Vec<OccurrenceGroup> = Vec::new();
        for group in groups {
            match merged.iter_mut().find(|g| g.word == group.word) {
                Some(existing) => existing.offsets.extend(group.offsets),
                None => merged.push(group),
            }
        }
        for group in &mut merged {
            group.offsets.sort_unstable();
            group.offsets.dedup();
        }
        merged.retain(|g| !g.word.is_empty() && g.offsets.len() >= 2);
        merged.sort_by_key(|g| g.offsets[0]);
        Self { groups: merged }
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// `true` when no word repeats.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group at `index`.
    pub fn get(&self, index: usize) -> Option<&OccurrenceGroup> {
        self.groups.get(index)
    }

    /// Iterate groups in order.
    pub fn iter(&self) -> std::slice::Iter<'_, OccurrenceGroup> {
        self.groups.iter()
    }

    /// Index of the group for `word`.
    pub fn position_of(&self, word: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.word == word)
    }

    /// Index of the group owning an occurrence that touches `offset`.
    ///
    /// Tokens never overlap and are separated by at least one non-word character, so at
    /// most one group can match.
    pub fn group_at(&self, offset: usize) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.occurrence_at(offset).is_some())
    }
}

impl<'a> IntoIterator for &'a GroupList {
    type Item = &'a OccurrenceGroup;
    type IntoIter = std::slice::Iter<'a, OccurrenceGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group `tokens` by exact text, shifting their offsets by `base_offset`.
pub fn index(tokens: &[Token], base_offset: usize) -> GroupList {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<OccurrenceGroup> = Vec::new();

    for token in tokens {
        let slot = *slots.entry(token.text.as_str()).or_insert_with(|| {
            groups.push(OccurrenceGroup {
                word: token.text.clone(),
                offsets: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].offsets.push(base_offset + token.offset);
    }

    groups.retain(|g| g.offsets.len() >= 2);
    GroupList { groups }
}

/// Scan `text` and index it in one step.
pub fn scan_and_index(text: &str, base_offset: usize, class: WordClass) -> GroupList {
    index(&scan_with(text, class), base_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::scan;

    fn summary(groups: &GroupList) -> Vec<(&str, Vec<usize>)> {
        groups
            .iter()
            .map(|g| (g.word.as_str(), g.offsets.clone()))
            .collect()
    }

    #[test]
    fn test_index_first_appearance_order() {
        let groups = index(&scan("foo bar foo baz bar foo"), 0);
        assert_eq!(
            summary(&groups),
            vec![("foo", vec![0, 8, 20]), ("bar", vec![4, 16])]
        );
    }

    #[test]
    fn test_index_applies_base_offset() {
        let groups = index(&scan("a b a"), 100);
        assert_eq!(summary(&groups), vec![("a", vec![100, 104])]);
    }

    #[test]
    fn test_index_is_case_sensitive() {
        let groups = index(&scan("Foo foo FOO"), 0);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_index_no_repeats() {
        assert!(index(&scan("alpha beta gamma"), 0).is_empty());
        assert!(index(&[], 0).is_empty());
    }

    #[test]
    fn test_occurrence_at_inclusive_edges() {
        let groups = index(&scan("foo bar foo baz bar foo"), 0);
        let bar = groups.get(1).unwrap();
        assert_eq!(bar.occurrence_at(16), Some(1));
        assert_eq!(bar.occurrence_at(19), Some(1));
        assert_eq!(bar.occurrence_at(20), None);
        assert_eq!(bar.occurrence_at(3), None);

        assert_eq!(groups.group_at(5), Some(1));
        assert_eq!(groups.group_at(9), Some(0));
        assert_eq!(groups.group_at(13), None);
        assert_eq!(groups.position_of("bar"), Some(1));
        assert_eq!(bar.spans().collect::<Vec<_>>(), vec![4..7, 16..19]);
    }

    #[test]
    fn test_rebased_spans_flag_touched_occurrences() {
        let groups = index(&scan("foo bar foo bar"), 0);
        let foo = groups.get(0).unwrap();
        // Replace both "foo"s with "x", last first.
        let edits = [
            TextEdit {
                start: 8,
                deleted_text: "foo".to_string(),
                inserted_text: "x".to_string(),
            },
            TextEdit {
                start: 0,
                deleted_text: "foo".to_string(),
                inserted_text: "x".to_string(),
            },
        ];
        let spans = foo.rebased_spans(&edits);
        assert_eq!(spans, vec![(0..1, true), (6..7, true)]);

        let bar = groups.get(1).unwrap();
        let spans = bar.rebased_spans(&edits);
        assert_eq!(spans, vec![(2..5, false), (8..11, false)]);
    }

    #[test]
    fn test_from_groups_merges_and_drops_singletons() {
        let groups = GroupList::from_groups([
            OccurrenceGroup {
                word: "b".to_string(),
                offsets: vec![9, 4],
            },
            OccurrenceGroup {
                word: "a".to_string(),
                offsets: vec![2],
            },
            OccurrenceGroup {
                word: "b".to_string(),
                offsets: vec![0, 4],
            },
            OccurrenceGroup {
                word: "c".to_string(),
                offsets: vec![6, 12],
            },
        ]);
        let expected = vec![("b", vec![0, 4, 9]), ("c", vec![6, 12])];
        assert_eq!(summary(&groups), expected);
    }
}
