//! Per-client sprint board.

use serde::{Deserialize, Serialize};

use super::{Client, ClientTask, SprintKey, TaskStatus};

/// A client's backlog and active sprint, grouped the way the board shows them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintBoard {
    pub client: Client,
    /// Key of the active sprint
    pub sprint_key: SprintKey,
    /// Suggested tasks waiting for review, newest first
    pub backlog: Vec<ClientTask>,
    /// Approved and waiting for production
    pub queued: Vec<ClientTask>,
    /// In progress or under alteration
    pub in_production: Vec<ClientTask>,
    /// Delivered this sprint
    pub delivered: Vec<ClientTask>,
}

impl SprintBoard {
    /// Sorts a client's tasks into board columns.
    ///
    /// Tasks are expected newest first; that order is kept within each
    /// column. Tasks from other sprints and rejected tasks are left out.
    pub fn from_tasks(client: Client, tasks: Vec<ClientTask>) -> Self {
        let sprint_key = client.active_sprint_key();
        let mut board = Self {
            client,
            sprint_key,
            backlog: Vec::new(),
            queued: Vec::new(),
            in_production: Vec::new(),
            delivered: Vec::new(),
        };

        for task in tasks {
            if task.status == TaskStatus::Suggested {
                board.backlog.push(task);
                continue;
            }
            if task.sprint_key != Some(sprint_key) || !task.status.is_on_sprint_board() {
                continue;
            }
            match task.status {
                TaskStatus::Queued => board.queued.push(task),
                TaskStatus::InProgress | TaskStatus::Alteration => board.in_production.push(task),
                TaskStatus::Done => board.delivered.push(task),
                TaskStatus::Suggested | TaskStatus::Rejected => {}
            }
        }

        board
    }

    /// Number of tasks in the active sprint.
    pub fn sprint_len(&self) -> usize {
        self.queued.len() + self.in_production.len() + self.delivered.len()
    }
}
