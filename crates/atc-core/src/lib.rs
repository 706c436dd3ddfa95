//! Core analytical pipeline: flight-plan conflict detection, hotspot
//! aggregation, and resolution scoring. No networking dependencies.

pub mod airports;
pub mod conflict;
pub mod error;
pub mod geodesy;
pub mod hotspot;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod resolver;
pub mod trajectory;

pub use error::{AnalysisError, Issue, IssueKind};
pub use models::{
    ConflictEvent, ConstraintClass, FlightPlan, HotspotCell, ResolutionCandidate, TrajectoryPoint,
};
pub use pipeline::{analyze, AnalysisConfig, AnalysisReport};
