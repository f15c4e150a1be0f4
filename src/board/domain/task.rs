//! Task entity, its drafts, edits, and column transitions.

use super::{BoardDomainError, CapacityExceeded, Column, ColumnId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task title, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTaskTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable reason recorded with the latest move or edit.
///
/// Blank reasons are not representable: a caller passing an empty string
/// leaves the task's previous reason in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionReason(String);

impl TransitionReason {
    /// Creates a reason, returning `None` for blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Returns the reason as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A task in a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    column_id: ColumnId,
    title: String,
    content: String,
    position: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    update_reason: Option<String>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Column currently holding the task.
    pub column_id: ColumnId,
    /// Task title.
    pub title: String,
    /// Markdown content.
    pub content: String,
    /// Ordering key within the column.
    pub position: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Reason recorded with the latest move or edit.
    pub update_reason: Option<String>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            column_id: data.column_id,
            title: data.title,
            content: data.content,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
            update_reason: data.update_reason,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the column currently holding the task.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the markdown content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the ordering key within the column.
    #[must_use]
    pub const fn position(&self) -> i64 {
        self.position
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the reason recorded with the latest move or edit.
    #[must_use]
    pub fn update_reason(&self) -> Option<&str> {
        self.update_reason.as_deref()
    }

    /// Applies an in-place edit.
    pub fn apply_edit(&mut self, edit: &TaskEdit) {
        edit.content.clone_into(&mut self.content);
        if let Some(title) = &edit.title {
            title.as_str().clone_into(&mut self.title);
        }
        self.record(edit.reason.as_ref(), edit.edited_at);
    }

    /// Moves the task into `target`, which currently holds `occupancy`
    /// tasks, placing it at `next_position`.
    ///
    /// Moving into the task's own column only refreshes the timestamp and
    /// reason; it neither consults the WIP limit nor changes position.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityExceeded`] when `target` is full. The task is left
    /// untouched in that case.
    pub fn move_to(
        &mut self,
        target: &Column,
        occupancy: usize,
        next_position: i64,
        transition: &TaskTransition,
    ) -> Result<(), CapacityExceeded> {
        if self.column_id != target.id() {
            target.admit(occupancy)?;
            self.column_id = target.id();
            self.position = next_position;
        }
        self.record(transition.reason.as_ref(), transition.moved_at);
        Ok(())
    }

    /// Stamps `updated_at` and replaces the reason only when one is given.
    fn record(&mut self, reason: Option<&TransitionReason>, at: DateTime<Utc>) {
        if let Some(reason) = reason {
            self.update_reason = Some(reason.as_str().to_owned());
        }
        self.updated_at = at;
    }
}

/// A task that has been validated but not yet placed in a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    id: TaskId,
    title: TaskTitle,
    content: String,
    created_at: DateTime<Utc>,
}

impl TaskDraft {
    /// Creates a draft stamped with the current clock time.
    #[must_use]
    pub fn new(title: TaskTitle, content: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            title,
            content: content.into(),
            created_at: clock.utc(),
        }
    }

    /// Returns the identifier the task will receive.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Places the draft in `column_id` at `position`.
    #[must_use]
    pub fn place(&self, column_id: ColumnId, position: i64) -> Task {
        Task {
            id: self.id,
            column_id,
            title: self.title.as_str().to_owned(),
            content: self.content.clone(),
            position,
            created_at: self.created_at,
            updated_at: self.created_at,
            update_reason: None,
        }
    }
}

/// In-place edit of a task's content, and optionally its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    content: String,
    title: Option<TaskTitle>,
    reason: Option<TransitionReason>,
    edited_at: DateTime<Utc>,
}

impl TaskEdit {
    /// Creates an edit replacing the content, stamped with the clock time.
    #[must_use]
    pub fn new(content: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            content: content.into(),
            title: None,
            reason: None,
            edited_at: clock.utc(),
        }
    }

    /// Also replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Records a reason with the edit.
    #[must_use]
    pub fn with_reason(mut self, reason: Option<TransitionReason>) -> Self {
        self.reason = reason;
        self
    }
}

/// A requested move of one task into a target column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTransition {
    task_id: TaskId,
    target_column_id: ColumnId,
    reason: Option<TransitionReason>,
    moved_at: DateTime<Utc>,
}

impl TaskTransition {
    /// Creates a transition stamped with the current clock time.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        target_column_id: ColumnId,
        reason: Option<TransitionReason>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            task_id,
            target_column_id,
            reason,
            moved_at: clock.utc(),
        }
    }

    /// Returns the task being moved.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the destination column.
    #[must_use]
    pub const fn target_column_id(&self) -> ColumnId {
        self.target_column_id
    }

    /// Returns the reason recorded with the move, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&TransitionReason> {
        self.reason.as_ref()
    }
}
