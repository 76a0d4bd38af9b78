//! Status enumerations for client tasks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of client task statuses.
///
/// `done` is the canonical delivered state; `completed` is accepted as an
/// alias wherever a status is parsed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Submitted by the client, waiting for staff review (the backlog)
    Suggested,

    /// Approved and scheduled into a sprint
    Queued,

    /// Being produced
    InProgress,

    /// Sent back for rework
    Alteration,

    /// Delivered to the client
    #[serde(alias = "completed")]
    Done,

    /// Declined by staff
    Rejected,
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suggested" => Ok(TaskStatus::Suggested),
            "queued" => Ok(TaskStatus::Queued),
            "in_progress" | "inprogress" | "in-progress" => Ok(TaskStatus::InProgress),
            "alteration" => Ok(TaskStatus::Alteration),
            "done" | "completed" => Ok(TaskStatus::Done),
            "rejected" => Ok(TaskStatus::Rejected),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

impl TaskStatus {
    /// Every status in board order.
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Suggested,
        TaskStatus::Queued,
        TaskStatus::InProgress,
        TaskStatus::Alteration,
        TaskStatus::Done,
        TaskStatus::Rejected,
    ];

    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Suggested => "suggested",
            TaskStatus::Queued => "queued",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Alteration => "alteration",
            TaskStatus::Done => "done",
            TaskStatus::Rejected => "rejected",
        }
    }

    /// Reads a status persisted by an older writer.
    ///
    /// Unrecognized values fall back to `Queued` instead of failing the whole
    /// row; caller-supplied statuses go through [`FromStr`] and are rejected.
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            log::warn!("Unrecognized stored task status '{raw}', reading it as queued");
            TaskStatus::Queued
        })
    }

    /// Whether the task counts as delivered.
    pub fn is_delivered(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    /// Whether the task belongs on the active sprint board.
    pub fn is_on_sprint_board(&self) -> bool {
        matches!(
            self,
            TaskStatus::Queued | TaskStatus::InProgress | TaskStatus::Alteration | TaskStatus::Done
        )
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use sprintdesk_core::models::TaskStatus;
    ///
    /// assert_eq!(TaskStatus::Done.with_icon(), "✓ Delivered");
    /// assert_eq!(TaskStatus::Alteration.with_icon(), "↺ Alteration");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            TaskStatus::Suggested => "◇ Suggested",
            TaskStatus::Queued => "○ Queued",
            TaskStatus::InProgress => "➤ In Progress",
            TaskStatus::Alteration => "↺ Alteration",
            TaskStatus::Done => "✓ Delivered",
            TaskStatus::Rejected => "✗ Rejected",
        }
    }
}

/// Who originated a client task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    /// Submitted by the client from their board
    Client,
    /// Created by staff, including sprint generation
    Admin,
}

impl FromStr for CreatedBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(CreatedBy::Client),
            "admin" => Ok(CreatedBy::Admin),
            _ => Err(format!("Invalid task origin: {s}")),
        }
    }
}

impl CreatedBy {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatedBy::Client => "client",
            CreatedBy::Admin => "admin",
        }
    }
}
