//! Session manager.
//!
//! [`SyncEditSession`] owns one [`SessionState`] and executes the three commands (`start`,
//! `next`, `cancel`) plus the two host notifications (selection changed, text changed).
//!
//! # Lifecycle
//!
//! ```text
//!            start (repeats found)
//!  Inactive ───────────────────────► Active ──┐ next / retarget / extend
//!     ▲                                │  ▲───┘
//!     └──── cancel / caret leaves ─────┘
//! ```
//!
//! Every highlight the session creates is disposed when the session ends or is superseded by
//! another `start`. A host failure while (re)applying selections or highlights rolls the
//! session back to inactive.
//!
//! # Example
//!
//! ```rust
//! use sync_edit::{MemoryEditor, SyncEditConfig, SyncEditSession};
//!
//! let mut editor = MemoryEditor::new("foo bar foo baz bar foo");
//! editor.select(0, 23);
//!
//! let mut session = SyncEditSession::new(SyncEditConfig::default());
//! session.start(&mut editor).unwrap();
//! assert_eq!(session.current_group().unwrap().word, "foo");
//! assert_eq!(editor.selection_offsets_all(), vec![(0, 3), (8, 11), (20, 23)]);
//!
//! session.next(&mut editor).unwrap();
//! assert_eq!(session.current_group().unwrap().word, "bar");
//! ```

use crate::config::SyncEditConfig;
use crate::error::{Notice, SyncEditError};
use crate::host::{EditorHost, EditorId, HighlightHandle, HighlightStyle, SelectionChangeEvent};
use crate::index::{GroupList, OccurrenceGroup, scan_and_index};
use crate::policy::{CaretDecision, CaretEvent, OffsetSelection, PolicyContext, decide};
use crate::position::Selection;
use crate::projector::{project, project_carets, word_ranges};
use crate::region::{Region, TextEdit};
use crate::state::SessionState;
use crate::tokenizer::is_word;
use serde::{Deserialize, Serialize};

/// How `next` obtains the group list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Rescan the live region text before advancing, and after every document edit.
    #[default]
    Rescan,
    /// Reuse the groups captured at start, moving their offsets through each edit.
    Static,
}

/// Result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A session started.
    Started {
        /// The current word.
        word: String,
        /// Number of repeated-word groups.
        group_count: usize,
    },
    /// `start` found no selected text.
    EmptySelection,
    /// `start` found no repeated word.
    NoRepeats,
    /// The current group changed.
    Switched {
        /// The new current word.
        word: String,
        /// Its group index.
        index: usize,
    },
    /// A rescan found no repeated word; nothing changed.
    NothingToDo,
    /// The session ended.
    Ended,
    /// There was no session to act on.
    Inactive,
}

#[derive(Debug, Default)]
struct Highlights {
    word: Option<HighlightHandle>,
    region: Option<HighlightHandle>,
}

/// One linked-editing session bound to an editor surface.
#[derive(Debug)]
pub struct SyncEditSession {
    config: SyncEditConfig,
    state: SessionState,
    editor: Option<EditorId>,
    highlights: Highlights,
    /// Offsets of the selections this session wrote last (echo suppression).
    last_applied: Option<Vec<OffsetSelection>>,
    previous_had_selection: bool,
}

impl Default for SyncEditSession {
    fn default() -> Self {
        Self::new(SyncEditConfig::default())
    }
}

impl SyncEditSession {
    /// Create an inactive session.
    pub fn new(config: SyncEditConfig) -> Self {
        Self {
            config,
            state: SessionState::inactive(),
            editor: None,
            highlights: Highlights::default(),
            last_applied: None,
            previous_had_selection: false,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SyncEditConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect at the next `start`.
    pub fn set_config(&mut self, config: SyncEditConfig) {
        self.config = config;
    }

    /// The session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether a session is running.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// The tracked region.
    pub fn region(&self) -> Option<Region> {
        self.state.region()
    }

    /// The current group.
    pub fn current_group(&self) -> Option<&OccurrenceGroup> {
        self.state.current_group()
    }

    /// The editor this session is bound to.
    pub fn editor(&self) -> Option<EditorId> {
        self.editor
    }

    /// `Start`: begin a session on the host's current selection.
    ///
    /// A running session is superseded.
    pub fn start<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<CommandOutcome, SyncEditError> {
        if self.state.is_active() {
            tracing::debug!("superseding running sync-edit session");
            self.release(host);
        }

        let Some(selection) = host.active_selection() else {
            return Ok(self.notify(host, Notice::EmptySelection, CommandOutcome::EmptySelection));
        };
        let (anchor, caret) = host.selection_offsets(&selection);
        let region = Region::new(anchor, caret);
        let text = if region.is_empty() {
            String::new()
        } else {
            host.text(region)
        };
        if text.is_empty() {
            return Ok(self.notify(host, Notice::EmptySelection, CommandOutcome::EmptySelection));
        }

        let groups = scan_and_index(&text, region.start, self.config.word_class);
        let Some(state) = SessionState::activate(region, groups) else {
            tracing::debug!(?region, "no repeated words in region");
            return Ok(self.notify(host, Notice::NoRepeats, CommandOutcome::NoRepeats));
        };

        self.state = state;
        self.editor = Some(host.editor_id());
        self.previous_had_selection = true;

        if let Err(err) = self.install(host) {
            tracing::warn!("failed to activate sync-edit session: {}", err);
            self.release(host);
            return Err(err);
        }

        let word = self.current_word();
        let group_count = self.state.groups().len();
        tracing::debug!(%word, group_count, ?region, "sync-edit session started");
        Ok(self.notify(
            host,
            Notice::Started {
                word: word.clone(),
                group_count,
            },
            CommandOutcome::Started { word, group_count },
        ))
    }

    /// `Next`: make the following repeated word current.
    pub fn next<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<CommandOutcome, SyncEditError> {
        if !self.state.is_active() {
            return Ok(CommandOutcome::Inactive);
        }

        match self.config.refresh_policy {
            RefreshPolicy::Static => {
                if self.state.is_stale() {
                    return Ok(self.notify(host, Notice::NothingToDo, CommandOutcome::NothingToDo));
                }
                self.state.advance();
            }
            RefreshPolicy::Rescan => {
                let Some(groups) = self.rescan(&*host) else {
                    return Ok(self.notify(host, Notice::NothingToDo, CommandOutcome::NothingToDo));
                };
                let anchor = groups
                    .position_of(&self.current_word())
                    .unwrap_or_else(|| self.state.current_index().min(groups.len() - 1));
                let target = (anchor + 1) % groups.len();
                self.state.replace_groups(groups, target);
            }
        }

        self.switched(host)
    }

    /// `Cancel`: end the session. Does nothing when inactive.
    pub fn cancel<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<CommandOutcome, SyncEditError> {
        if !self.state.is_active() {
            return Ok(CommandOutcome::Inactive);
        }
        let caret = host
            .active_selection()
            .map(|selection| host.position_to_offset(selection.end));
        Ok(self.terminate(host, caret))
    }

    /// Feed a selection change from the host.
    pub fn on_selection_changed<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &SelectionChangeEvent,
    ) -> Result<CaretDecision, SyncEditError> {
        let caret_event = CaretEvent {
            editor: event.editor,
            selections: event
                .selections
                .iter()
                .map(|selection| {
                    let (anchor, caret) = host.selection_offsets(selection);
                    OffsetSelection::new(anchor, caret)
                })
                .collect(),
        };

        let decision = {
            let ctx = PolicyContext {
                editor: self.editor.unwrap_or_else(|| host.editor_id()),
                last_applied: self.last_applied.as_deref(),
                previous_had_selection: self.previous_had_selection,
                strictness: self.config.continuation,
            };
            decide(&self.state, &caret_event, &ctx)
        };

        match decision {
            CaretDecision::Ignore => return Ok(decision),
            CaretDecision::NoOp => {
                tracing::trace!("selection change needs no action");
            }
            CaretDecision::Terminate => {
                let caret = caret_event.selections.first().map(|s| s.caret);
                tracing::debug!(?caret, "caret left the sync-edit session");
                self.terminate(host, caret);
            }
            CaretDecision::Retarget(index) => {
                tracing::debug!(index, "retargeting by caret");
                self.state.select(index);
                self.switched(host)?;
            }
            CaretDecision::ExtendCurrentGroup { column } => {
                tracing::debug!(column, "continuing on every occurrence");
                let carets = match self.state.current_group() {
                    Some(group) => project_carets(group, column, &*host),
                    None => Vec::new(),
                };
                if let Err(err) = self.apply_selections(host, carets) {
                    self.release(host);
                    return Err(err);
                }
            }
        }

        if self.state.is_active() {
            self.previous_had_selection = caret_event.has_selected_text();
        }
        Ok(decision)
    }

    /// Feed document edits (in application order) from the host.
    ///
    /// The region follows the edits. With [`RefreshPolicy::Rescan`] the groups are rebuilt from
    /// the edited text; with [`RefreshPolicy::Static`] the captured occurrences move through the
    /// edits, and the current word is re-read from the document. Either way the group under the
    /// primary caret becomes current, so a word being typed into on every occurrence stays
    /// current as it changes. When no word repeats any more the groups are marked stale.
    pub fn on_text_changed<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        edits: &[TextEdit],
    ) -> Result<(), SyncEditError> {
        if !self.state.is_active() || edits.is_empty() {
            return Ok(());
        }
        let Some(region) = self.state.region() else {
            return Ok(());
        };
        let region = region.rebase_all(edits);
        self.state.set_region(region);

        let refreshed = match self.config.refresh_policy {
            RefreshPolicy::Rescan => self.rescan(&*host).map(|groups| (groups, None)),
            // Stale offsets cannot be moved again; only a rescan would recover them.
            RefreshPolicy::Static if self.state.is_stale() => None,
            RefreshPolicy::Static => self.rebase_groups(&*host, edits),
        };

        match refreshed {
            Some((groups, word)) => {
                let caret = host
                    .active_selection()
                    .map(|selection| host.position_to_offset(selection.end));
                let word = word.unwrap_or_else(|| self.current_word());
                let target = caret
                    .and_then(|c| groups.group_at(c))
                    .or_else(|| groups.position_of(&word))
                    .unwrap_or(self.state.current_index());
                self.state.replace_groups(groups, target);
            }
            None => {
                tracing::debug!(?region, "edited region has no repeated words");
                self.state.mark_stale();
            }
        }

        let show_word = !self.state.is_stale();
        if let Err(err) = self.refresh_highlights(host, show_word) {
            self.release(host);
            return Err(err);
        }
        Ok(())
    }

    fn current_word(&self) -> String {
        self.state
            .current_group()
            .map(|group| group.word.clone())
            .unwrap_or_default()
    }

    fn rescan<H: EditorHost + ?Sized>(&self, host: &H) -> Option<GroupList> {
        let region = self.state.region()?;
        let groups = scan_and_index(&host.text(region), region.start, self.config.word_class);
        (!groups.is_empty()).then_some(groups)
    }

    /// Move the captured groups through `edits`.
    ///
    /// The current group re-reads each occurrence from the document and keeps those that
    /// still hold the same single word, which becomes the group's new word. Other groups
    /// keep only the occurrences no edit touched. Returns the new list and the current word.
    fn rebase_groups<H: EditorHost + ?Sized>(
        &self,
        host: &H,
        edits: &[TextEdit],
    ) -> Option<(GroupList, Option<String>)> {
        let region = self.state.region()?;
        let class = self.config.word_class;
        let inside = |span: &std::ops::Range<usize>| {
            region.start <= span.start && span.end <= region.end && span.start < span.end
        };

        let mut word = None;
        let mut groups = Vec::with_capacity(self.state.groups().len());
        for (index, group) in self.state.groups().iter().enumerate() {
            let spans = group.rebased_spans(edits);
            if index != self.state.current_index() {
                let offsets = spans
                    .into_iter()
                    .filter(|(span, touched)| !touched && inside(span))
                    .map(|(span, _)| span.start)
                    .collect();
                groups.push(OccurrenceGroup {
                    word: group.word.clone(),
                    offsets,
                });
                continue;
            }

            let texts: Vec<_> = spans
                .into_iter()
                .filter(|(span, _)| inside(span))
                .map(|(span, _)| (span.start, host.text(Region::new(span.start, span.end))))
                .collect();
            let Some(current) = texts.iter().find(|(_, text)| is_word(text, class)) else {
                continue;
            };
            let current = current.1.clone();
            let offsets = texts
                .iter()
                .filter(|(_, text)| *text == current)
                .map(|(offset, _)| *offset)
                .collect();
            groups.push(OccurrenceGroup {
                word: current.clone(),
                offsets,
            });
            word = Some(current);
        }

        let groups = GroupList::from_groups(groups);
        (!groups.is_empty()).then_some((groups, word))
    }

    fn switched<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<CommandOutcome, SyncEditError> {
        if let Err(err) = self.show_current(host) {
            self.release(host);
            return Err(err);
        }
        let word = self.current_word();
        let index = self.state.current_index();
        Ok(self.notify(
            host,
            Notice::Switched { word: word.clone() },
            CommandOutcome::Switched { word, index },
        ))
    }

    fn install<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<(), SyncEditError> {
        let colors = self.config.resolve_colors();
        self.highlights.word =
            Some(host.create_highlight(HighlightStyle::foreground(colors.word_text))?);
        self.highlights.region =
            Some(host.create_highlight(HighlightStyle::background(colors.region_background))?);
        self.show_current(host)
    }

    /// Select every occurrence of the current group and repaint.
    fn show_current<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Result<(), SyncEditError> {
        let Some(group) = self.state.current_group() else {
            return Ok(());
        };
        let selections = project(group, self.config.caret_placement, &*host);
        self.apply_selections(host, selections)?;
        self.refresh_highlights(host, true)
    }

    fn apply_selections<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        selections: Vec<Selection>,
    ) -> Result<(), SyncEditError> {
        let snapshot = selections
            .iter()
            .map(|selection| {
                let (anchor, caret) = host.selection_offsets(selection);
                OffsetSelection::new(anchor, caret)
            })
            .collect();
        self.last_applied = Some(snapshot);
        host.set_selections(selections)?;
        Ok(())
    }

    /// Repaint both highlights. Word ranges are clipped to the region; stale groups paint
    /// no word ranges at all.
    fn refresh_highlights<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        show_word: bool,
    ) -> Result<(), SyncEditError> {
        let Some(region) = self.state.region() else {
            return Ok(());
        };
        if let Some(handle) = self.highlights.word {
            let ranges: Vec<_> = match self.state.current_group() {
                Some(group) if show_word => word_ranges(group)
                    .into_iter()
                    .filter(|range| region.start <= range.start && range.end <= region.end)
                    .collect(),
                _ => Vec::new(),
            };
            host.apply_highlight(handle, &ranges)?;
        }
        if let Some(handle) = self.highlights.region {
            host.apply_highlight(handle, &[region.range()])?;
        }
        Ok(())
    }

    fn terminate<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        caret: Option<usize>,
    ) -> CommandOutcome {
        // Release first so the echo of the collapse below finds an inactive session.
        self.release(host);

        if let Some(caret) = caret {
            let position = host.offset_to_position(caret);
            if let Err(err) = host.set_selections(vec![Selection::caret(position)]) {
                tracing::warn!("failed to collapse selections: {}", err);
            }
        }

        tracing::debug!("sync-edit session ended");
        self.notify(host, Notice::Ended, CommandOutcome::Ended)
    }

    /// Dispose highlights (best effort) and reset to inactive.
    fn release<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        let highlights = std::mem::take(&mut self.highlights);
        for handle in [highlights.word, highlights.region].into_iter().flatten() {
            if let Err(err) = host.dispose_highlight(handle) {
                tracing::warn!(?handle, "failed to dispose highlight: {}", err);
            }
        }
        self.state.reset();
        self.editor = None;
        self.last_applied = None;
        self.previous_had_selection = false;
    }

    fn notify<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        notice: Notice,
        outcome: CommandOutcome,
    ) -> CommandOutcome {
        host.show_message(&notice.to_string());
        outcome
    }
}
