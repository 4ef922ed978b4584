//! # Calculator Console (Demo)
//!
//! Line-oriented driver for the calculator display.
//! It is NOT a terminal UI; every line is a batch of keys followed by one frame.
//!
//! ## Input
//!
//! - Plain characters map to keys (`0-9 . + - * x / ( ) =`, `i` insert mode,
//!   `a` last answer, `<`/`>` move or scroll)
//! - `:q` quits, `:t <ms>` advances time, `:mc :mr :m+ :m-` memory keys
//! - `:r label=value;...` and `:f <description>` stand in for the calculation service;
//!   `:fn <id>` picks the function they answer for (`P1` by default)

pub mod commands;
pub mod logging;

use calc_core::CalcKey;
use log::{debug, warn};
use services_calc_display::{
    CalculationRequest, CalculationResponse, CalculationService, DisplayConfig, DisplayController,
    ServiceError, ValidationOutcome, NANOS_PER_MILLI, PUSH_PULL_FUNCTION_ID,
};

pub use commands::{Command, CommandError, CommandParser};

/// Result of one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    Continue,
    Quit,
}

/// Service that replays a scripted outcome
struct ScriptedService {
    outcome: Result<CalculationResponse, String>,
}

impl CalculationService for ScriptedService {
    fn calculate(
        &mut self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, ServiceError> {
        debug!("scripted reply for {}", request.function_id);
        self.outcome.clone().map_err(ServiceError::Rejected)
    }
}

/// Console host around one display controller
pub struct CalcConsole {
    controller: DisplayController,
    function_id: String,
}

impl CalcConsole {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            controller: DisplayController::with_config(config),
            function_id: PUSH_PULL_FUNCTION_ID.to_string(),
        }
    }

    pub fn controller(&self) -> &DisplayController {
        &self.controller
    }

    /// Feed one line of input
    pub fn process_line(&mut self, line: &str) -> Result<ConsoleAction, CommandError> {
        if let Some(cmd) = line.trim().strip_prefix(':') {
            let command = CommandParser::parse(cmd)?;
            return Ok(self.run_command(command));
        }

        for byte in line.bytes() {
            match CalcKey::from_ascii(byte) {
                Some(key) => {
                    self.controller.apply_key(key);
                }
                None if byte.is_ascii_whitespace() => {}
                None => debug!("no key for byte {:#04x}", byte),
            }
        }
        Ok(ConsoleAction::Continue)
    }

    fn run_command(&mut self, command: Command) -> ConsoleAction {
        match command {
            Command::Quit => return ConsoleAction::Quit,
            Command::Tick(ms) => self.controller.advance_time(ms.saturating_mul(NANOS_PER_MILLI)),
            Command::Memory(key) => {
                self.controller.press_memory(key);
            }
            Command::Result(entries) => {
                self.calculate(Ok(CalculationResponse::from_entries(entries)));
            }
            Command::Fail(description) => self.calculate(Err(description)),
            Command::Function(id) => self.function_id = id,
        }
        ConsoleAction::Continue
    }

    fn calculate(&mut self, outcome: Result<CalculationResponse, String>) {
        let mut service = ScriptedService { outcome };
        if let Err(err) = self.controller.run_calculation(
            &mut service,
            CalculationRequest::new(self.function_id.as_str()),
            ValidationOutcome::Valid,
        ) {
            warn!("console calculation failed: {}", err);
        }
    }

    /// Text frame: main display, result pane (if any) and status line
    pub fn render_frame(&self) -> String {
        let view = self.controller.render();
        let mut frame = format!(
            "[{} {}] {}\n",
            view.main.font_tier.as_str(),
            view.entry_mode.as_str(),
            view.main.marked()
        );

        if view.main.result_placeholder {
            if view.up_indicator {
                frame.push_str("  ^\n");
            }
            for line in &view.result_lines {
                frame.push_str("  ");
                frame.push_str(line);
                frame.push('\n');
            }
            if view.down_indicator {
                frame.push_str("  v\n");
            }
        } else {
            frame.push_str("> ");
            frame.push_str(&view.status);
            frame.push('\n');
        }
        frame
    }
}

impl Default for CalcConsole {
    fn default() -> Self {
        Self::new(DisplayConfig::default())
    }
}
