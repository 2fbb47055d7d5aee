#![warn(missing_docs)]
//! Sync Edit - linked simultaneous editing of repeated words
//!
//! # Overview
//!
//! `sync-edit` is a headless editor feature: the user selects a region, every word that occurs
//! more than once in it is indexed, and one multi-cursor selection per occurrence of the
//! current word is handed to the editor. Typing through the editor's normal multi-cursor
//! editing then changes every occurrence at once. The user can cycle through the repeated
//! words, or jump to one by moving the caret onto it; leaving the region ends the session.
//!
//! The crate does not render anything and owns no document. It talks to the editor through
//! the [`EditorHost`] trait; [`MemoryEditor`] is a complete in-memory implementation.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Session manager (start / next / cancel)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Caret policy          Selection projector  │  ← Decisions / host writes
//! ├─────────────────────────────────────────────┤
//! │  Session state (region, groups, current)    │  ← Owned state
//! ├─────────────────────────────────────────────┤
//! │  Occurrence index  ←  Tokenizer             │  ← Pure functions
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use sync_edit::{MemoryEditor, SyncEditSession, CommandOutcome};
//!
//! let mut editor = MemoryEditor::new("let x = y; x = x + y;");
//! editor.select(0, 21);
//!
//! let mut session = SyncEditSession::default();
//! let outcome = session.start(&mut editor).unwrap();
//! assert_eq!(outcome, CommandOutcome::Started { word: "x".to_string(), group_count: 2 });
//!
//! // Deliver the editor's echo of the selections we just set.
//! editor.pump(&mut session).unwrap();
//!
//! // Type over every "x" at once.
//! editor.type_into(&mut session, "count").unwrap();
//! assert_eq!(editor.text_string(), "let count = y; count = count + y;");
//! assert!(session.is_active());
//! ```
//!
//! # Module Description
//!
//! - [`tokenizer`] - maximal word-character runs
//! - [`index`] - repeated-word groups in first-appearance order
//! - [`state`] - session state and its invariants
//! - [`policy`] - caret policy (terminate / retarget / extend / no-op)
//! - [`projector`] - occurrence offsets to editor selections
//! - [`session`] - the session manager and its commands
//! - [`host`] - the editor interface
//! - [`memory`] - in-memory editor host
//! - [`config`] / [`presets`] - configuration and colour presets
//!
//! # Offsets
//!
//! All offsets are character offsets (Unicode scalar values), never bytes.

pub mod config;
pub mod error;
pub mod host;
pub mod index;
pub mod memory;
pub mod policy;
pub mod position;
pub mod presets;
pub mod projector;
pub mod region;
pub mod session;
pub mod state;
mod text;
pub mod tokenizer;

pub use config::{HighlightColors, Rgba, SyncEditConfig};
pub use error::{HostError, Notice, SyncEditError};
pub use host::{EditorHost, EditorId, HighlightHandle, HighlightStyle, SelectionChangeEvent};
pub use index::{GroupList, OccurrenceGroup, index, scan_and_index};
pub use memory::{HighlightEntry, MemoryEditor};
pub use policy::{
    CaretDecision, CaretEvent, ContinuationStrictness, OffsetSelection, PolicyContext, decide,
};
pub use position::{Position, Selection, SelectionDirection};
pub use projector::{CaretPlacement, project};
pub use region::{Region, TextEdit};
pub use session::{CommandOutcome, RefreshPolicy, SyncEditSession};
pub use state::SessionState;
pub use tokenizer::{Token, WordClass, scan, scan_with};
