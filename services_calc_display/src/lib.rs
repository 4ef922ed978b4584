//! # Calculator Display Service
//!
//! Drives the calculator display: live expression editing, transient status
//! messages and the function-result viewer.
//!
//! ## Philosophy
//!
//! - **Explicit state**: Buffer, memory and last answer belong to one controller,
//!   so independent calculators never share state
//! - **Logical time**: Status reverts fire when the host advances the clock
//! - **Last write wins**: One pending revert at a time; a newer message cancels it
//! - **Testable**: Every behaviour is reachable through typed keys
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A form or validation engine
//! - A client for any particular calculation backend
//! - Persistent across sessions
//!
//! ## Design
//!
//! - Keys arrive as `CalcKey` values and mutate the `ExpressionBuffer`
//! - Every frame is re-derived from the raw buffer (`DisplayController::render`)
//! - Calculation requests are split into submit and complete, so the host decides
//!   how the service call is carried out

pub mod config;
pub mod controller;
pub mod render;
pub mod service;
pub mod session;
pub mod status;
pub mod viewer;

pub use config::{ConfigError, DisplayConfig, FontTiers, NANOS_PER_MILLI};
pub use controller::{DisplayController, DisplayError, DisplayResult, KeyOutcome};
pub use render::{DisplayView, FontTier, RenderedDisplay, END_CURSOR_GLYPH, RESULT_PLACEHOLDER};
pub use service::{
    CalculationRequest, CalculationResponse, CalculationService, CalculationTicket, ParamValue,
    PendingCalculation, ResultEntry, ServiceError, ValidationOutcome, PUSH_PULL_FUNCTION_ID,
};
pub use session::{DisplaySession, DisplayState};
pub use status::{PendingRevert, RevertTarget, StatusId, StatusLine};
pub use viewer::ResultViewer;
