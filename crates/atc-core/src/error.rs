//! Error and issue types for the analysis pipeline.
//!
//! `AnalysisError` is what individual passes raise internally; most of it
//! never escapes `analyze` as an `Err` — it is caught per-flight and folded
//! into an `Issue` so one bad flight plan does not abort the batch. Only
//! `AnalysisError::Internal` is allowed to propagate out.

use serde::Serialize;
use thiserror::Error;

/// Raised by individual passes while processing one flight.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{acid}: expected object, got {found}")]
    Schema { acid: String, found: String },

    #[error("{acid}: missing required field '{field}'")]
    MissingField { acid: String, field: &'static str },

    #[error("{acid}: field '{field}' expected {expected}")]
    WrongType {
        acid: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{acid}: invalid waypoint '{token}'")]
    InvalidWaypoint { acid: String, token: String },

    #[error("{acid}: route is empty")]
    EmptyRoute { acid: String },

    #[error("{acid}: route must include at least two waypoints")]
    UnexpandableRoute { acid: String },

    #[error("{acid}: route distance must be positive")]
    NonPositiveDistance { acid: String },

    #[error("{acid}: sample cadence must be positive")]
    NonPositiveCadence { acid: String },

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// The flight reference this error is attributed to, when there is one.
    pub fn flight_ref(&self) -> Option<&str> {
        match self {
            AnalysisError::Schema { acid, .. }
            | AnalysisError::MissingField { acid, .. }
            | AnalysisError::WrongType { acid, .. }
            | AnalysisError::InvalidWaypoint { acid, .. }
            | AnalysisError::EmptyRoute { acid }
            | AnalysisError::UnexpandableRoute { acid }
            | AnalysisError::NonPositiveDistance { acid }
            | AnalysisError::NonPositiveCadence { acid } => Some(acid),
            AnalysisError::Internal(_) => None,
        }
    }
}

/// Category of a non-fatal, accumulated diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Schema,
    Route,
    Trajectory,
    ConstraintWarning,
}

/// One accumulated diagnostic attached to the batch-level report.
///
/// Unlike `AnalysisError`, an `Issue` never aborts anything — it is the
/// thing that ends up in `AnalysisReport::issues`.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub flight_ref: String,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(flight_ref: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        let issue = Self {
            flight_ref: flight_ref.into(),
            kind,
            message: message.into(),
        };
        tracing::warn!(flight_ref = %issue.flight_ref, kind = ?issue.kind, message = %issue.message, "analysis issue");
        issue
    }

    /// Convert a raised `AnalysisError` (attributed to a flight) into an issue.
    pub fn from_error(flight_ref: &str, kind: IssueKind, err: &AnalysisError) -> Self {
        Self::new(flight_ref, kind, err.to_string())
    }
}
