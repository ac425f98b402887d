//! Identifier and validated scalar types for the board domain.

use super::BoardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a task, assigned by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a server-assigned task identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(u64);

impl BoardId {
    /// Wraps a server-assigned board identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user (task assignee).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a server-assigned user identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated task title: non-empty after trimming, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Largest title length accepted by the remote store.
    pub const MAX_CHARS: usize = 100;

    /// Creates a validated, trimmed task title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] when the value is empty
    /// after trimming, or [`BoardDomainError::TitleTooLong`] when it exceeds
    /// [`Self::MAX_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTitle);
        }
        let chars = trimmed.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(BoardDomainError::TitleTooLong(chars));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated task description: at most 500 characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Largest description length accepted by the remote store.
    pub const MAX_CHARS: usize = 500;

    /// Creates a validated task description.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DescriptionTooLong`] when the value
    /// exceeds [`Self::MAX_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let chars = raw.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(BoardDomainError::DescriptionTooLong(chars));
        }
        Ok(Self(raw))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
