//! Error types for timewheel-engine operations.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Task title is empty")]
    EmptyTitle,

    #[error("Invalid time range: {start}-{end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("Time range {start}-{end} overlaps existing task '{conflicting_id}'")]
    OverlapConflict {
        start: String,
        end: String,
        conflicting_id: String,
    },

    #[error("Invalid time: '{0}'")]
    InvalidTime(String),

    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Duplicate day for date {0}")]
    DuplicateDate(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

/// Stable, machine-readable classification of a [`PlannerError`].
///
/// UI collaborators match on this to pick a localized message instead of
/// parsing the `Display` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmptyTitle,
    InvalidTimeRange,
    OverlapConflict,
    InvalidTime,
    InvalidDate,
    TaskNotFound,
    DuplicateDate,
    InvalidTemplate,
}

impl PlannerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlannerError::EmptyTitle => ErrorKind::EmptyTitle,
            PlannerError::InvalidTimeRange { .. } => ErrorKind::InvalidTimeRange,
            PlannerError::OverlapConflict { .. } => ErrorKind::OverlapConflict,
            PlannerError::InvalidTime(_) => ErrorKind::InvalidTime,
            PlannerError::InvalidDate(_) => ErrorKind::InvalidDate,
            PlannerError::TaskNotFound(_) => ErrorKind::TaskNotFound,
            PlannerError::DuplicateDate(_) => ErrorKind::DuplicateDate,
            PlannerError::InvalidTemplate(_) => ErrorKind::InvalidTemplate,
        }
    }

    /// Whether retrying the same operation with `allow_overlap` would succeed.
    pub fn is_overlap(&self) -> bool {
        matches!(self, PlannerError::OverlapConflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
