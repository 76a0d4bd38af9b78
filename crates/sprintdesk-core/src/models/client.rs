//! Client model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{SprintKey, SprintNumber};

/// An agency client with its plan and sprint cursor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Unique identifier for the client
    pub id: u64,

    /// Display name
    pub name: String,

    /// Access code the client uses to open their board
    pub slug: String,

    /// Plan the client bought, if any
    pub plan_id: Option<u64>,

    /// Sprint the client is in; selects templates to generate and filters
    /// the active board
    pub current_sprint: Option<SprintNumber>,

    /// Timestamp when the client was created (UTC)
    pub created_at: Timestamp,
}

impl Client {
    /// Current sprint, treating an unset cursor as onboarding.
    pub fn sprint(&self) -> SprintNumber {
        self.current_sprint.unwrap_or(SprintNumber::ONBOARDING)
    }

    /// Key of the sprint shown on the client's board.
    pub fn active_sprint_key(&self) -> SprintKey {
        self.sprint().key()
    }
}
