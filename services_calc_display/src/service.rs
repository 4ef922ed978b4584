//! Calculation service boundary
//!
//! The display only marshals requests and formats what comes back. Field
//! validation and the calculation itself belong to collaborators.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Function whose results are split into PUSH and PULL groups
pub const PUSH_PULL_FUNCTION_ID: &str = "P1";

const PUSH_PREFIX: &str = "PUSH";
const PULL_PREFIX: &str = "PULL";
const PUSH_TITLE: &str = "ーPUSHー";
const PULL_TITLE: &str = "ーPULLー";

/// Calculation service failure
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Description reported by the service
    #[error("{0}")]
    Rejected(String),

    #[error("server error: {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Identifies one calculation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalculationTicket(Uuid);

impl CalculationTicket {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CalculationTicket {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CalculationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "calc:{}", self.0)
    }
}

/// Parameter value sent to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Request body: `{"functionId": ..., "params": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    #[serde(rename = "functionId")]
    pub function_id: String,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl CalculationRequest {
    pub fn new(function_id: impl Into<String>) -> Self {
        Self {
            function_id: function_id.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn to_json(&self) -> Result<String, ServiceError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One labelled value of a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub label: String,
    pub value: String,
}

/// Labelled result lines in service order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalculationResponse {
    entries: Vec<ResultEntry>,
}

impl CalculationResponse {
    pub fn from_entries<L, V>(entries: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, value)| ResultEntry {
                    label: label.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }

    /// Parse a success body, an object of label to value
    pub fn from_json(body: &str) -> Result<Self, ServiceError> {
        let map: Map<String, Value> = serde_json::from_str(body)?;
        Ok(Self::from_entries(
            map.into_iter().map(|(label, value)| (label, value_text(value))),
        ))
    }

    /// Interpret an HTTP-style reply
    pub fn from_http(status: u16, body: &str) -> Result<Self, ServiceError> {
        if (200..300).contains(&status) {
            return Self::from_json(body);
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(err) => Err(ServiceError::Rejected(err.error)),
            Err(_) => Err(ServiceError::Status(status)),
        }
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lines for the result viewer.
    ///
    /// Results of [`PUSH_PULL_FUNCTION_ID`] are grouped: PUSH entries, then
    /// PULL entries, prefixes stripped and the first line of each group
    /// titled. Their other entries are dropped. Every other function gets one
    /// `label: value` line per entry.
    pub fn format_lines(&self, function_id: &str) -> Vec<String> {
        if function_id != PUSH_PULL_FUNCTION_ID {
            return self
                .entries
                .iter()
                .map(|e| format!("{}: {}", e.label, e.value))
                .collect();
        }

        let mut lines = Vec::with_capacity(self.entries.len());
        for (prefix, title) in [(PUSH_PREFIX, PUSH_TITLE), (PULL_PREFIX, PULL_TITLE)] {
            for (i, (label, value)) in self.grouped(prefix).enumerate() {
                if i == 0 {
                    lines.push(format!("{}{}: {}", title, label, value));
                } else {
                    lines.push(format!("{}: {}", label, value));
                }
            }
        }
        lines
    }

    /// Entries labelled with `prefix`, the prefix and one following space removed
    fn grouped<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries.iter().filter_map(move |e| {
            e.label.strip_prefix(prefix).map(|rest| {
                let label = rest.strip_prefix(' ').unwrap_or(rest);
                (label, e.value.as_str())
            })
        })
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Outcome reported by the field-validation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid,
}

/// Request that has been accepted and is waiting for the service
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCalculation {
    pub ticket: CalculationTicket,
    pub request: CalculationRequest,
    /// Logical time of submission
    pub submitted_ns: u64,
}

impl PendingCalculation {
    /// Logical time spent waiting as of `now_ns`
    pub fn elapsed_ns(&self, now_ns: u64) -> u64 {
        now_ns.saturating_sub(self.submitted_ns)
    }
}

/// Remote calculation collaborator
pub trait CalculationService {
    fn calculate(&mut self, request: &CalculationRequest)
        -> Result<CalculationResponse, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = CalculationRequest::new("P1")
            .with_param("bore", 50.0)
            .with_param("unit", "MPa")
            .with_param(
                "pressures",
                ParamValue::List(vec![ParamValue::Number(1.0), ParamValue::Number(2.5)]),
            );

        let json: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(json["functionId"], "P1");
        assert_eq!(json["params"]["bore"], 50.0);
        assert_eq!(json["params"]["unit"], "MPa");
        assert_eq!(json["params"]["pressures"][1], 2.5);
    }

    #[test]
    fn test_response_keeps_service_order() {
        let response =
            CalculationResponse::from_json(r#"{"zeta": "1", "alpha": "2", "mid": 3.5}"#).unwrap();
        let labels: Vec<_> = response.entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["zeta", "alpha", "mid"]);
        assert_eq!(response.entries()[2].value, "3.5");
    }

    #[test]
    fn test_generic_lines() {
        let response = CalculationResponse::from_entries([("Force", "12.5 kN"), ("Area", "3 cm2")]);
        assert_eq!(
            response.format_lines("P2"),
            ["Force: 12.5 kN", "Area: 3 cm2"]
        );
    }

    #[test]
    fn test_push_pull_grouping() {
        let response = CalculationResponse::from_entries([
            ("PULL Force", "8"),
            ("PUSH Force", "10"),
            ("Note", "ok"),
            ("PUSH Speed", "2"),
            ("PULL Speed", "3"),
        ]);
        assert_eq!(
            response.format_lines(PUSH_PULL_FUNCTION_ID),
            [
                "ーPUSHーForce: 10",
                "Speed: 2",
                "ーPULLーForce: 8",
                "Speed: 3",
            ]
        );
    }

    #[test]
    fn test_push_pull_labels_plain_for_other_functions() {
        let response =
            CalculationResponse::from_entries([("PUSH Force", "10"), ("PULL Force", "8")]);
        assert_eq!(
            response.format_lines("P4"),
            ["PUSH Force: 10", "PULL Force: 8"]
        );
    }

    #[test]
    fn test_pull_only_grouping() {
        let response = CalculationResponse::from_entries([("PULL Force", "8")]);
        assert_eq!(
            response.format_lines(PUSH_PULL_FUNCTION_ID),
            ["ーPULLーForce: 8"]
        );
    }

    #[test]
    fn test_pending_elapsed() {
        let pending = PendingCalculation {
            ticket: CalculationTicket::new(),
            request: CalculationRequest::new("P1"),
            submitted_ns: 2_000,
        };
        assert_eq!(pending.elapsed_ns(5_000), 3_000);
        assert_eq!(pending.elapsed_ns(1_000), 0);
    }

    #[test]
    fn test_empty_response() {
        let response = CalculationResponse::from_json("{}").unwrap();
        assert!(response.is_empty());
        assert!(response.format_lines(PUSH_PULL_FUNCTION_ID).is_empty());
        assert!(!CalculationResponse::from_entries([("a", "1")]).is_empty());
    }

    #[test]
    fn test_http_failure_with_body() {
        let err = CalculationResponse::from_http(400, r#"{"error": "bore out of range"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "bore out of range");
    }

    #[test]
    fn test_http_failure_without_body() {
        let err = CalculationResponse::from_http(502, "<html>").unwrap_err();
        assert!(matches!(err, ServiceError::Status(502)));
        assert_eq!(err.to_string(), "server error: 502");
    }

    #[test]
    fn test_http_success_with_bad_payload() {
        let err = CalculationResponse::from_http(200, "[1, 2]").unwrap_err();
        assert!(matches!(err, ServiceError::Payload(_)));
    }
}
