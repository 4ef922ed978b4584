//! Display session state

use crate::status::StatusLine;

/// What occupies the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// Live expression with cursor
    #[default]
    Editing,
    /// A function result has taken over the display
    ResultDisplayed,
}

impl DisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayState::Editing => "EDITING",
            DisplayState::ResultDisplayed => "RESULT",
        }
    }
}

/// Per-calculator state outside the expression buffer.
///
/// Memory and the last answer live as long as the session.
#[derive(Debug, Clone, Default)]
pub struct DisplaySession {
    state: DisplayState,
    status: StatusLine,
    memory: f64,
    last_result: f64,
}

impl DisplaySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn set_state(&mut self, state: DisplayState) {
        self.state = state;
    }

    pub fn is_result_displayed(&self) -> bool {
        self.state == DisplayState::ResultDisplayed
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusLine {
        &mut self.status
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn clear_memory(&mut self) {
        self.memory = 0.0;
    }

    /// Add `value` to memory. A sum that is not finite leaves memory unchanged
    /// and returns false.
    pub fn add_to_memory(&mut self, value: f64) -> bool {
        let sum = self.memory + value;
        if !sum.is_finite() {
            return false;
        }
        self.memory = sum;
        true
    }

    pub fn last_result(&self) -> f64 {
        self.last_result
    }

    pub fn set_last_result(&mut self, value: f64) {
        self.last_result = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = DisplaySession::new();
        assert_eq!(session.state(), DisplayState::Editing);
        assert_eq!(session.memory(), 0.0);
        assert_eq!(session.last_result(), 0.0);
        assert_eq!(session.status().text(), "");
    }

    #[test]
    fn test_memory_accumulates() {
        let mut session = DisplaySession::new();
        session.add_to_memory(12.0);
        session.add_to_memory(-2.5);
        assert_eq!(session.memory(), 9.5);
        session.clear_memory();
        assert_eq!(session.memory(), 0.0);
    }

    #[test]
    fn test_memory_overflow_rejected() {
        let mut session = DisplaySession::new();
        assert!(session.add_to_memory(f64::MAX));
        assert!(!session.add_to_memory(f64::MAX));
        assert_eq!(session.memory(), f64::MAX);
        assert!(session.add_to_memory(-f64::MAX));
        assert_eq!(session.memory(), 0.0);
    }
}
