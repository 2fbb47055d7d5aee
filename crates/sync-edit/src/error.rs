//! Errors and user-facing notices.
//!
//! Expected outcomes (nothing selected, no repeated words, session ended) are never errors:
//! they surface as a [`Notice`] shown through the host. Errors are reserved for host refusals
//! and configuration problems.

use crate::host::HighlightHandle;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures reported by an [`EditorHost`](crate::host::EditorHost).
pub enum HostError {
    #[error("unknown highlight handle {0:?}")]
    /// The handle was never created or has already been disposed.
    UnknownHighlight(HighlightHandle),

    #[error("host refused to dispose highlight {0:?}")]
    /// The host declined to release a highlight.
    DisposeRefused(HighlightHandle),

    #[error("invalid range: {start}..{end}")]
    /// A range fell outside the document.
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },

    #[error("{0}")]
    /// Host-specific failure.
    Other(String),
}

#[derive(Debug, Error)]
/// Errors produced by this crate.
pub enum SyncEditError {
    #[error("host error: {0}")]
    /// An editor host operation failed.
    Host(#[from] HostError),

    #[error("YAML parse error: {0}")]
    /// Configuration YAML could not be parsed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Reading configuration failed.
    Io(#[from] std::io::Error),

    #[error("invalid color '{0}': expected #rrggbb or #rrggbbaa")]
    /// A colour string was malformed.
    InvalidColor(String),
}

/// Informational message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// `Start` was invoked without selected text.
    EmptySelection,
    /// The selected region has no repeated word.
    NoRepeats,
    /// A session started on `word`, with `group_count` repeated words available.
    Started {
        /// The word selected first.
        word: String,
        /// Number of repeated-word groups.
        group_count: usize,
    },
    /// The current word changed (via `Next` or by moving the caret).
    Switched {
        /// The newly selected word.
        word: String,
    },
    /// A rescan found nothing left to cycle through.
    NothingToDo,
    /// The session ended.
    Ended,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::EmptySelection => write!(f, "SyncEdit: no text selected"),
            Notice::NoRepeats => {
                write!(f, "SyncEdit: no word occurs more than once in the selection")
            }
            Notice::Started { word, group_count } => {
                write!(f, "SyncEdit: editing \"{}\" ({} words)", word, group_count)
            }
            Notice::Switched { word } => write!(f, "SyncEdit: switched to \"{}\"", word),
            Notice::NothingToDo => write!(f, "SyncEdit: no repeated words left in the region"),
            Notice::Ended => write!(f, "SyncEdit: ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            Notice::Started {
                word: "foo".to_string(),
                group_count: 2
            }
            .to_string(),
            "SyncEdit: editing \"foo\" (2 words)"
        );
        assert_eq!(Notice::Ended.to_string(), "SyncEdit: ended");
    }

    #[test]
    fn test_host_error_converts() {
        let err: SyncEditError = HostError::DisposeRefused(HighlightHandle(7)).into();
        assert!(matches!(err, SyncEditError::Host(_)));
        assert_eq!(
            err.to_string(),
            "host error: host refused to dispose highlight HighlightHandle(7)"
        );
    }
}
