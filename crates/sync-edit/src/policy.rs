//! Caret policy: what a selection change means for the running session.
//!
//! The policy works in character offsets and never touches the host; the session converts
//! each event first and executes the returned [`CaretDecision`].
//!
//! Rules, first match wins:
//!
//! 1. inactive session, or an event from another editor: ignore
//! 2. the event reproduces the selections the session itself just applied: no-op
//! 3. primary caret outside the region: terminate
//! 4. primary caret on an occurrence of a different group: retarget to that group
//! 5. a single caret matching the continuation signature: extend the current group
//! 6. any other single caret: terminate
//! 7. otherwise (carets moving inside the current group): no-op
//!
//! While the state is stale its offsets no longer match the text, so rules 4 and 5 never
//! fire: multiple carets are left alone and a single caret terminates.

use crate::host::EditorId;
use crate::state::SessionState;
use serde::{Deserialize, Serialize};

/// A selection in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetSelection {
    /// Anchor offset.
    pub anchor: usize,
    /// Caret offset.
    pub caret: usize,
}

impl OffsetSelection {
    /// Create an offset selection.
    pub fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    /// `true` for a plain caret.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.caret
    }
}

/// A selection change converted to offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretEvent {
    /// Source editor.
    pub editor: EditorId,
    /// Selections, primary first.
    pub selections: Vec<OffsetSelection>,
}

impl CaretEvent {
    fn primary_caret(&self) -> Option<usize> {
        self.selections.first().map(|s| s.caret)
    }

    fn single_caret(&self) -> Option<usize> {
        match self.selections.as_slice() {
            [only] if only.is_empty() => Some(only.caret),
            _ => None,
        }
    }

    pub(crate) fn has_selected_text(&self) -> bool {
        self.selections.iter().any(|s| !s.is_empty())
    }
}

/// How readily a collapse to a single caret is read as "keep typing" rather than "leave".
///
/// Telling the two apart is a heuristic; `Exact` reproduces the position-equality test, the
/// other levels trade false terminations against false continuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationStrictness {
    /// Any single caret outside another group's occurrence ends the session.
    Strict,
    /// Continue only when the caret lands exactly on the caret edge of a selection the session
    /// applied, and the previous event still selected text.
    #[default]
    Exact,
    /// Continue whenever the caret is on an occurrence of the current group.
    Lenient,
}

/// Outcome of evaluating one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretDecision {
    /// Not ours to handle.
    Ignore,
    /// Nothing changes.
    NoOp,
    /// End the session.
    Terminate,
    /// Make group `index` current.
    Retarget(usize),
    /// Put one caret on every occurrence of the current group, `column` characters past its start.
    ExtendCurrentGroup {
        /// Caret offset relative to the occurrence start.
        column: usize,
    },
}

/// What the policy needs besides the state and the event.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    /// The editor the session is bound to.
    pub editor: EditorId,
    /// Selections the session wrote most recently, if any.
    pub last_applied: Option<&'a [OffsetSelection]>,
    /// Whether the previously observed event selected any text.
    pub previous_had_selection: bool,
    /// Continuation strictness.
    pub strictness: ContinuationStrictness,
}

/// Evaluate `event` against `state`.
pub fn decide(state: &SessionState, event: &CaretEvent, ctx: &PolicyContext<'_>) -> CaretDecision {
    if !state.is_active() || event.editor != ctx.editor {
        return CaretDecision::Ignore;
    }
    let (Some(region), Some(current)) = (state.region(), state.current_group()) else {
        return CaretDecision::Ignore;
    };
    let Some(caret) = event.primary_caret() else {
        return CaretDecision::NoOp;
    };

    if ctx
        .last_applied
        .is_some_and(|applied| same_selection_set(applied, &event.selections))
    {
        return CaretDecision::NoOp;
    }

    if !region.contains_caret(caret) {
        return CaretDecision::Terminate;
    }

    if !state.is_stale()
        && let Some(group) = state.groups().group_at(caret)
        && group != state.current_index()
    {
        return CaretDecision::Retarget(group);
    }

    if let Some(single) = event.single_caret() {
        if state.is_stale() {
            return CaretDecision::Terminate;
        }
        let Some(occurrence) = current.occurrence_at(single) else {
            return CaretDecision::Terminate;
        };
        let start = current.offsets[occurrence];
        let continues = match ctx.strictness {
            ContinuationStrictness::Strict => false,
            ContinuationStrictness::Exact => {
                ctx.previous_had_selection
                    && ctx
                        .last_applied
                        .is_some_and(|applied| applied.iter().any(|s| s.caret == single))
            }
            ContinuationStrictness::Lenient => true,
        };
        return if continues {
            CaretDecision::ExtendCurrentGroup {
                column: single - start,
            }
        } else {
            CaretDecision::Terminate
        };
    }

    CaretDecision::NoOp
}

fn same_selection_set(a: &[OffsetSelection], b: &[OffsetSelection]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}
