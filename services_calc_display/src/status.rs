//! Status line with a single deferred-revert slot
//!
//! A transient message records where the line should go back to and when.
//! Only one revert is ever pending: showing anything new drops the old one,
//! so a stale revert can never clobber a newer message.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one shown status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusId(Uuid);

impl StatusId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for StatusId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status:{}", self.0)
    }
}

/// What the line shows once a transient message expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertTarget {
    /// The live expression at the moment the revert fires
    LiveExpression,
    /// Fixed text, e.g. the result being displayed
    Text(String),
}

/// Scheduled revert of a transient message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRevert {
    pub id: StatusId,
    pub deadline_ns: u64,
    pub restore: RevertTarget,
}

/// Sub-display text
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    text: String,
    current: Option<StatusId>,
    pending: Option<PendingRevert>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pending(&self) -> Option<&PendingRevert> {
        self.pending.as_ref()
    }

    /// Show a persistent message, cancelling any pending revert
    pub fn show(&mut self, text: impl Into<String>) -> StatusId {
        let id = StatusId::new();
        self.text = text.into();
        self.current = Some(id);
        self.pending = None;
        id
    }

    /// Show a message that reverts to `restore` at `deadline_ns`
    pub fn show_temporary(
        &mut self,
        text: impl Into<String>,
        deadline_ns: u64,
        restore: RevertTarget,
    ) -> StatusId {
        let id = self.show(text);
        self.pending = Some(PendingRevert {
            id,
            deadline_ns,
            restore,
        });
        id
    }

    /// Take the pending revert if its deadline has passed.
    ///
    /// The caller resolves the target and shows it.
    pub fn take_due(&mut self, now_ns: u64) -> Option<PendingRevert> {
        match &self.pending {
            Some(pending) if pending.deadline_ns <= now_ns && self.current == Some(pending.id) => {
                self.pending.take()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_is_persistent() {
        let mut line = StatusLine::new();
        line.show("5 + 3");
        assert_eq!(line.text(), "5 + 3");
        assert!(line.pending().is_none());
        assert!(line.take_due(u64::MAX).is_none());
    }

    #[test]
    fn test_temporary_fires_at_deadline() {
        let mut line = StatusLine::new();
        let id = line.show_temporary("INS", 1_500, RevertTarget::LiveExpression);

        assert_eq!(line.text(), "INS");
        assert!(line.take_due(1_499).is_none());

        let due = line.take_due(1_500).unwrap();
        assert_eq!(due.id, id);
        assert_eq!(due.restore, RevertTarget::LiveExpression);
        assert!(line.pending().is_none());
    }

    #[test]
    fn test_newer_message_cancels_revert() {
        let mut line = StatusLine::new();
        line.show_temporary("added 12", 1_000, RevertTarget::LiveExpression);
        let newer = line.show_temporary("memory cleared", 2_000, RevertTarget::LiveExpression);

        assert!(line.take_due(1_000).is_none());
        assert_eq!(line.text(), "memory cleared");

        let due = line.take_due(2_000).unwrap();
        assert_eq!(due.id, newer);
    }

    #[test]
    fn test_persistent_show_drops_pending() {
        let mut line = StatusLine::new();
        line.show_temporary("OVR", 1_000, RevertTarget::Text("x".into()));
        line.show("12");
        assert!(line.take_due(5_000).is_none());
        assert_eq!(line.text(), "12");
    }

    #[test]
    fn test_status_id_display() {
        let id = StatusId::new();
        assert!(id.to_string().starts_with("status:"));
        assert_ne!(id, StatusId::new());
    }
}
