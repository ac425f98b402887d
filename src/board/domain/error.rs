//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the remote store's length limit.
    #[error("task title is {0} characters long, maximum is {max}", max = super::TaskTitle::MAX_CHARS)]
    TitleTooLong(usize),

    /// The task description exceeds the remote store's length limit.
    #[error(
        "task description is {0} characters long, maximum is {max}",
        max = super::TaskDescription::MAX_CHARS
    )]
    DescriptionTooLong(usize),
}

/// Error returned while parsing task statuses from their wire spelling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from their wire spelling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
