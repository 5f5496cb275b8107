//! Error types for route planning

use thiserror::Error;

use crate::point::GridPoint;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid coordinate: {0:?}")]
    InvalidCoordinate(String),

    #[error("Invalid direction: {0:?} (expected one of N, S, E, W)")]
    InvalidDirection(String),

    #[error("Goal for obstacle {obstacle} lands outside the grid at ({x}, {y})")]
    GoalOutOfBounds { obstacle: GridPoint, x: i64, y: i64 },

    #[error("No path from {from} to {to}")]
    PathNotFound { from: GridPoint, to: GridPoint },

    #[error("No route visits all {goals} goals")]
    RouteNotFound { goals: usize },

    #[error("Deadline exceeded before every goal ordering was checked")]
    DeadlineExceeded,

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("A route worker thread panicked")]
    WorkerPanicked,
}

impl PlanError {
    /// True for both single-search and whole-route failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PlanError::PathNotFound { .. } | PlanError::RouteNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
