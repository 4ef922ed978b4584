//! Display controller

use calc_core::{
    BufferSnapshot, CalcKey, EntryMode, EvalError, Evaluation, Evaluator, ExpressionBuffer,
    MemoryKey,
};
use log::{debug, info, warn};
use thiserror::Error;

use crate::config::{DisplayConfig, NANOS_PER_MILLI};
use crate::render::{DisplayView, RenderedDisplay};
use crate::service::{
    CalculationRequest, CalculationResponse, CalculationService, CalculationTicket,
    PendingCalculation, ServiceError, ValidationOutcome,
};
use crate::session::{DisplaySession, DisplayState};
use crate::status::{RevertTarget, StatusId};
use crate::viewer::ResultViewer;

const EXPRESSION_ERROR: &str = "expression error";
const COMPUTING: &str = "computing...";
const CHECK_INPUT: &str = "check input values";
const MEMORY_CLEARED: &str = "memory cleared";

/// Display error
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Invalid expression: {0}")]
    InvalidExpression(#[from] EvalError),

    #[error("Calculation service error: {0}")]
    CalculationService(#[from] ServiceError),

    #[error("Input validation failed")]
    ValidationFailed,

    #[error("No result is displayed")]
    NotDisplayingResult,
}

/// Display result
pub type DisplayResult<T> = Result<T, DisplayError>;

/// Effect of one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Buffer, session or status changed
    Changed,
    /// Dropped by policy (digit limit, non-numeric memory operand, nothing to do)
    Ignored,
}

impl KeyOutcome {
    fn from_changed(changed: bool) -> Self {
        if changed {
            KeyOutcome::Changed
        } else {
            KeyOutcome::Ignored
        }
    }
}

/// Calculator display: expression buffer, session and result viewer driven
/// by discrete keys on a logical clock.
pub struct DisplayController {
    buffer: ExpressionBuffer,
    session: DisplaySession,
    viewer: Option<ResultViewer>,
    config: DisplayConfig,
    now_ns: u64,
}

impl DisplayController {
    pub fn new() -> Self {
        Self::with_config(DisplayConfig::default())
    }

    pub fn with_config(config: DisplayConfig) -> Self {
        let mut controller = Self {
            buffer: ExpressionBuffer::new(),
            session: DisplaySession::new(),
            viewer: None,
            config,
            now_ns: 0,
        };
        let text = controller.buffer.text().to_string();
        controller.session.status_mut().show(text);
        controller
    }

    pub fn buffer(&self) -> &ExpressionBuffer {
        &self.buffer
    }

    pub fn session(&self) -> &DisplaySession {
        &self.session
    }

    pub fn viewer(&self) -> Option<&ResultViewer> {
        self.viewer.as_ref()
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn state(&self) -> DisplayState {
        self.session.state()
    }

    pub fn status_text(&self) -> &str {
        self.session.status().text()
    }

    pub fn memory(&self) -> f64 {
        self.session.memory()
    }

    pub fn last_result(&self) -> f64 {
        self.session.last_result()
    }

    pub fn now_ns(&self) -> u64 {
        self.now_ns
    }

    /// Buffer state for parity checks and host-side logging
    pub fn snapshot(&self) -> BufferSnapshot {
        self.buffer.snapshot()
    }

    /// Dispatch one key from the UI shell
    pub fn apply_key(&mut self, key: CalcKey) -> KeyOutcome {
        debug!("key {:?} in {}", key, self.session.state().as_str());
        let in_result = self.session.is_result_displayed();

        match key {
            CalcKey::Evaluate if in_result => KeyOutcome::Ignored,
            CalcKey::Evaluate => {
                // Failures are reported on the status line
                let _ = self.evaluate();
                KeyOutcome::Changed
            }
            CalcKey::Backspace if in_result => self.full_clear(),
            CalcKey::Backspace => self.backspace(),
            CalcKey::ClearAll => self.full_clear(),
            CalcKey::ToggleInsert => self.toggle_insert(),
            CalcKey::Memory(memory_key) => self.press_memory(memory_key),
            CalcKey::Left if in_result => KeyOutcome::from_changed(self.scroll_up().unwrap_or(false)),
            CalcKey::Right if in_result => {
                KeyOutcome::from_changed(self.scroll_down().unwrap_or(false))
            }
            CalcKey::Left => KeyOutcome::from_changed(self.buffer.move_left()),
            CalcKey::Right => KeyOutcome::from_changed(self.buffer.move_right()),
            CalcKey::Answer => self.answer(),
            other => match other.insertion_text() {
                Some(text) => self.insert(text),
                None => KeyOutcome::Ignored,
            },
        }
    }

    /// Splice text at the cursor, leaving result mode first
    pub fn insert(&mut self, text: &str) -> KeyOutcome {
        let cleared = self.session.is_result_displayed();
        if cleared {
            self.full_clear();
        }

        if self.buffer.insert(text) {
            self.show_expression();
            KeyOutcome::Changed
        } else {
            debug!("insertion of {:?} dropped at digit limit", text);
            KeyOutcome::from_changed(cleared)
        }
    }

    pub fn backspace(&mut self) -> KeyOutcome {
        if self.buffer.backspace() {
            self.show_expression();
            KeyOutcome::Changed
        } else {
            KeyOutcome::Ignored
        }
    }

    /// Reset to `"0"` and leave result mode. Entry mode and memory survive.
    pub fn full_clear(&mut self) -> KeyOutcome {
        if self.session.is_result_displayed() {
            info!("leaving result display");
        }
        self.buffer.reset();
        self.viewer = None;
        self.session.set_state(DisplayState::Editing);
        self.show_expression();
        KeyOutcome::Changed
    }

    pub fn toggle_insert(&mut self) -> KeyOutcome {
        let mode = self.buffer.toggle_mode();
        self.show_temporary(mode.as_str());
        KeyOutcome::Changed
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.buffer.mode()
    }

    /// Evaluate the buffer in place.
    ///
    /// On failure the buffer is untouched and a transient error is shown.
    pub fn evaluate(&mut self) -> DisplayResult<Evaluation> {
        let expression = self.buffer.text().to_string();
        match Evaluator::evaluate(&expression) {
            Ok(evaluation) => {
                self.session.set_last_result(evaluation.value);
                self.buffer.replace(evaluation.rendered.clone());
                self.session
                    .status_mut()
                    .show(format!("{} =", expression));
                Ok(evaluation)
            }
            Err(err) => {
                warn!("evaluation of {:?} failed: {}", expression, err);
                self.show_temporary(EXPRESSION_ERROR);
                Err(err.into())
            }
        }
    }

    pub fn press_memory(&mut self, key: MemoryKey) -> KeyOutcome {
        match key {
            MemoryKey::Clear => {
                self.session.clear_memory();
                self.show_temporary(MEMORY_CLEARED);
                KeyOutcome::Changed
            }
            MemoryKey::Recall => {
                if self.session.is_result_displayed() {
                    self.full_clear();
                }
                self.buffer.replace(Evaluator::render(self.session.memory()));
                self.show_expression();
                KeyOutcome::Changed
            }
            MemoryKey::Add | MemoryKey::Subtract => {
                let Some(value) = Evaluator::numeric_value(self.buffer.text()) else {
                    debug!("{} ignored for non-numeric buffer", key.as_str());
                    return KeyOutcome::Ignored;
                };
                let (delta, verb) = match key {
                    MemoryKey::Add => (value, "added"),
                    _ => (-value, "subtracted"),
                };
                if !self.session.add_to_memory(delta) {
                    warn!("{} ignored: memory would overflow", key.as_str());
                    return KeyOutcome::Ignored;
                }
                self.show_temporary(format!("{} {}", verb, Evaluator::render(value)));
                KeyOutcome::Changed
            }
        }
    }

    /// Insert the last answer as one token
    pub fn answer(&mut self) -> KeyOutcome {
        let text = Evaluator::render(self.session.last_result());
        self.insert(&text)
    }

    pub fn scroll_up(&mut self) -> DisplayResult<bool> {
        self.viewer
            .as_mut()
            .map(ResultViewer::scroll_up)
            .ok_or(DisplayError::NotDisplayingResult)
    }

    pub fn scroll_down(&mut self) -> DisplayResult<bool> {
        self.viewer
            .as_mut()
            .map(ResultViewer::scroll_down)
            .ok_or(DisplayError::NotDisplayingResult)
    }

    /// Accept a request from the form collaborator.
    ///
    /// The editor stays usable while the request is in flight.
    pub fn submit_calculation(
        &mut self,
        request: CalculationRequest,
        validation: ValidationOutcome,
    ) -> DisplayResult<PendingCalculation> {
        if validation == ValidationOutcome::Invalid {
            warn!("calculation {} rejected by validation", request.function_id);
            self.show_temporary(CHECK_INPUT);
            return Err(DisplayError::ValidationFailed);
        }

        let pending = PendingCalculation {
            ticket: CalculationTicket::new(),
            request,
            submitted_ns: self.now_ns,
        };
        info!(
            "calculation {} submitted as {}",
            pending.request.function_id, pending.ticket
        );
        self.show_temporary(COMPUTING);
        Ok(pending)
    }

    /// Apply the service's answer to a submitted request.
    ///
    /// Success replaces whatever the editor holds with the result viewer.
    /// Failure leaves the editor as it is and reports the description.
    pub fn complete_calculation(
        &mut self,
        pending: PendingCalculation,
        outcome: Result<CalculationResponse, ServiceError>,
    ) -> DisplayResult<()> {
        match outcome {
            Ok(response) => {
                if response.is_empty() {
                    warn!("calculation {} returned no entries", pending.ticket);
                }
                self.full_clear();
                let viewer = ResultViewer::new(
                    response.format_lines(&pending.request.function_id),
                    self.config.line_height,
                    self.config.viewport_height,
                );
                self.session.status_mut().show(viewer.text());
                self.viewer = Some(viewer);
                self.session.set_state(DisplayState::ResultDisplayed);
                info!(
                    "showing result of {} after {} ms",
                    pending.ticket,
                    pending.elapsed_ns(self.now_ns) / NANOS_PER_MILLI
                );
                Ok(())
            }
            Err(err) => {
                warn!("calculation {} failed: {}", pending.ticket, err);
                self.show_temporary(format!("calculation error: {}", err));
                Err(err.into())
            }
        }
    }

    /// Submit and complete against a synchronous service
    pub fn run_calculation<S: CalculationService + ?Sized>(
        &mut self,
        service: &mut S,
        request: CalculationRequest,
        validation: ValidationOutcome,
    ) -> DisplayResult<()> {
        let pending = self.submit_calculation(request, validation)?;
        let outcome = service.calculate(&pending.request);
        self.complete_calculation(pending, outcome)
    }

    /// Advance the logical clock, firing a due status revert
    pub fn advance_time(&mut self, delta_ns: u64) {
        self.set_time(self.now_ns.saturating_add(delta_ns));
    }

    pub fn set_time(&mut self, now_ns: u64) {
        self.now_ns = now_ns;
        if let Some(due) = self.session.status_mut().take_due(now_ns) {
            let text = match due.restore {
                RevertTarget::LiveExpression => self.buffer.text().to_string(),
                RevertTarget::Text(text) => text,
            };
            debug!("{} reverted", due.id);
            self.session.status_mut().show(text);
        }
    }

    /// Current frame
    pub fn render(&self) -> DisplayView {
        let tiers = &self.config.font_tiers;
        match (&self.viewer, self.session.state()) {
            (Some(viewer), DisplayState::ResultDisplayed) => DisplayView {
                main: RenderedDisplay::placeholder(tiers),
                status: self.status_text().to_string(),
                entry_mode: self.buffer.mode(),
                result_lines: viewer.visible_lines().to_vec(),
                up_indicator: viewer.up_indicator(),
                down_indicator: viewer.down_indicator(),
            },
            _ => DisplayView {
                main: RenderedDisplay::editing(&self.buffer, tiers),
                status: self.status_text().to_string(),
                entry_mode: self.buffer.mode(),
                result_lines: Vec::new(),
                up_indicator: false,
                down_indicator: false,
            },
        }
    }

    fn show_expression(&mut self) {
        let text = self.buffer.text().to_string();
        self.session.status_mut().show(text);
    }

    fn show_temporary(&mut self, text: impl Into<String>) -> StatusId {
        let restore = match &self.viewer {
            Some(viewer) if self.session.is_result_displayed() => RevertTarget::Text(viewer.text()),
            _ => RevertTarget::LiveExpression,
        };
        let deadline = self.now_ns.saturating_add(self.config.status_revert_ns());
        self.session
            .status_mut()
            .show_temporary(text, deadline, restore)
    }
}

impl Default for DisplayController {
    fn default() -> Self {
        Self::new()
    }
}
