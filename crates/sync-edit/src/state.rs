//! Session state: which region is tracked and which repeated word is current.
//!
//! Invariant: when active, `groups` is non-empty and `current_index < groups.len()`. Every
//! mutator preserves it; anything that would break it resets the state to inactive instead.

use crate::index::{GroupList, OccurrenceGroup};
use crate::region::Region;

/// The state owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    region: Option<Region>,
    groups: GroupList,
    current_index: usize,
    active: bool,
    stale: bool,
}

impl SessionState {
    /// The inactive state (no region, no groups).
    pub fn inactive() -> Self {
        Self::default()
    }

    /// An active state on the first group, or `None` if `groups` is empty.
    pub fn activate(region: Region, groups: GroupList) -> Option<Self> {
        if groups.is_empty() {
            return None;
        }
        Some(Self {
            region: Some(region),
            groups,
            current_index: 0,
            active: true,
            stale: false,
        })
    }

    /// Whether a session is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the groups no longer describe the document.
    ///
    /// Set when an edit left no repeated word to track; cleared by the next group list.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The tracked region.
    pub fn region(&self) -> Option<Region> {
        self.region
    }

    /// All repeated-word groups.
    pub fn groups(&self) -> &GroupList {
        &self.groups
    }

    /// Index of the current group.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The current group, if active.
    pub fn current_group(&self) -> Option<&OccurrenceGroup> {
        if !self.active {
            return None;
        }
        self.groups.get(self.current_index)
    }

    /// Advance cyclically to the next group; returns the new index.
    pub(crate) fn advance(&mut self) -> usize {
        if self.active {
            self.current_index = (self.current_index + 1) % self.groups.len();
        }
        self.current_index
    }

    /// Select group `index`. Out-of-range indices are ignored.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if !self.active || index >= self.groups.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    /// Swap in a freshly scanned group list, selecting `current`.
    ///
    /// Empty lists are rejected and leave the state untouched.
    pub(crate) fn replace_groups(&mut self, groups: GroupList, current: usize) -> bool {
        if !self.active || groups.is_empty() {
            return false;
        }
        self.current_index = current.min(groups.len() - 1);
        self.groups = groups;
        self.stale = false;
        true
    }

    pub(crate) fn mark_stale(&mut self) {
        if self.active {
            self.stale = true;
        }
    }

    pub(crate) fn set_region(&mut self, region: Region) {
        if self.active {
            self.region = Some(region);
        }
    }

    /// Back to inactive.
    pub(crate) fn reset(&mut self) {
        *self = Self::inactive();
    }
}
