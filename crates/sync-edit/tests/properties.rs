use proptest::prelude::*;
use std::collections::HashSet;
use sync_edit::{
    CommandOutcome, EditorHost, MemoryEditor, SyncEditSession, WordClass, scan, scan_and_index,
};

fn char_slice(text: &str, start: usize, len: usize) -> String {
    text.chars().skip(start).take(len).collect()
}

// Small alphabets make repeats likely; "é" exercises char (not byte) offsets.
fn document() -> impl Strategy<Value = String> {
    "[abé ,\n]{0,60}"
}

proptest! {
    #[test]
    fn tokens_are_maximal_word_runs(text in document()) {
        let chars: Vec<char> = text.chars().collect();
        for token in scan(&text) {
            prop_assert_eq!(char_slice(&text, token.offset, token.char_len()), token.text.clone());
            if token.offset > 0 {
                prop_assert!(!chars[token.offset - 1].is_alphanumeric());
            }
            if let Some(next) = chars.get(token.offset + token.char_len()) {
                prop_assert!(!next.is_alphanumeric());
            }
        }
    }

    #[test]
    fn groups_hold_repeated_words_in_order(text in document(), base in 0usize..1000) {
        let groups = scan_and_index(&text, base, WordClass::Unicode);
        let mut words = HashSet::new();
        let mut previous_first = None;

        for group in &groups {
            prop_assert!(group.len() >= 2);
            prop_assert!(words.insert(group.word.clone()));
            prop_assert!(group.offsets.windows(2).all(|w| w[0] < w[1]));
            for &offset in &group.offsets {
                let found = char_slice(&text, offset - base, group.word_len());
                prop_assert_eq!(found, group.word.clone());
            }
            // First-appearance order.
            let first = group.offsets[0];
            prop_assert!(previous_first.is_none_or(|p| p < first));
            previous_first = Some(first);
        }

        // Every word seen at least twice has a group.
        let tokens = scan(&text);
        for token in &tokens {
            let count = tokens.iter().filter(|t| t.text == token.text).count();
            prop_assert_eq!(count >= 2, groups.position_of(&token.text).is_some());
        }
    }

    #[test]
    fn next_cycles_through_every_group(text in document()) {
        let len = text.chars().count();
        let mut editor = MemoryEditor::new(&text);
        editor.select(0, len);
        editor.take_events();

        let mut session = SyncEditSession::default();
        let outcome = session.start(&mut editor).unwrap();
        prop_assume!(matches!(outcome, CommandOutcome::Started { .. }));
        editor.pump(&mut session).unwrap();

        let group_count = session.state().groups().len();
        for step in 1..=group_count {
            session.next(&mut editor).unwrap();
            editor.pump(&mut session).unwrap();
            prop_assert!(session.is_active());
            prop_assert_eq!(session.state().current_index(), step % group_count);
        }
    }

    #[test]
    fn selections_cover_every_occurrence(text in document()) {
        let len = text.chars().count();
        let mut editor = MemoryEditor::new(&text);
        editor.select(0, len);

        let mut session = SyncEditSession::default();
        let outcome = session.start(&mut editor).unwrap();
        prop_assume!(matches!(outcome, CommandOutcome::Started { .. }));

        let group = session.current_group().unwrap().clone();
        let selections = editor.selections();
        prop_assert_eq!(selections.len(), group.len());
        for (selection, &offset) in selections.iter().zip(&group.offsets) {
            let anchor = editor.position_to_offset(selection.anchor());
            let caret = editor.position_to_offset(selection.active());
            prop_assert_eq!(anchor, offset);
            prop_assert_eq!(caret, offset + group.word_len());
        }
    }
}
