//! Sprint board output and the weekly summary sent to clients.

use std::fmt;

use crate::models::{ClientTask, SprintBoard};

impl SprintBoard {
    fn fmt_column(f: &mut fmt::Formatter<'_>, heading: &str, tasks: &[ClientTask]) -> fmt::Result {
        writeln!(f, "## {heading} ({})", tasks.len())?;
        writeln!(f)?;
        if tasks.is_empty() {
            writeln!(f, "Nothing here.")?;
            writeln!(f)?;
        }
        for task in tasks {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SprintBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {} · {}",
            self.client.name,
            self.sprint_key.label()
        )?;
        writeln!(f)?;

        Self::fmt_column(f, "Backlog", &self.backlog)?;
        Self::fmt_column(f, "Queued", &self.queued)?;
        Self::fmt_column(f, "In production", &self.in_production)?;
        Self::fmt_column(f, "Delivered", &self.delivered)
    }
}

/// Plain-text weekly schedule for a client, ready to paste into a message.
///
/// Sections are listed only when they have tasks.
///
/// ```rust
/// use sprintdesk_core::{display::SprintSummary, models::{Client, SprintBoard}};
/// use jiff::Timestamp;
///
/// let client = Client {
///     id: 1,
///     name: "Padaria Sol".to_string(),
///     slug: "sol".to_string(),
///     plan_id: None,
///     current_sprint: None,
///     created_at: Timestamp::now(),
/// };
/// let board = SprintBoard::from_tasks(client, vec![]);
///
/// let text = SprintSummary(&board).to_string();
/// assert!(text.starts_with("WEEKLY SCHEDULE - PADARIA SOL\nSprint 0\n"));
/// assert!(!text.contains("Delivered:"));
/// ```
pub struct SprintSummary<'a>(pub &'a SprintBoard);

impl SprintSummary<'_> {
    fn fmt_section(f: &mut fmt::Formatter<'_>, heading: &str, tasks: &[ClientTask]) -> fmt::Result {
        if tasks.is_empty() {
            return Ok(());
        }
        writeln!(f, "{heading}")?;
        for task in tasks {
            writeln!(f, "• {}", task.title)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for SprintSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        let name = if board.client.name.trim().is_empty() {
            "Client"
        } else {
            board.client.name.as_str()
        };

        writeln!(f, "WEEKLY SCHEDULE - {}", name.to_uppercase())?;
        writeln!(f, "{}", board.sprint_key.label())?;
        writeln!(f)?;

        Self::fmt_section(f, "✔ Delivered:", &board.delivered)?;
        Self::fmt_section(f, "🔄 In production:", &board.in_production)?;
        Self::fmt_section(f, "⏳ Approved / queued:", &board.queued)?;

        write!(f, "Any adjustments, just reach out here. 👍")
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{Client, CreatedBy, SprintNumber, TaskStatus};

    fn create_test_client() -> Client {
        Client {
            id: 1,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            plan_id: Some(1),
            current_sprint: SprintNumber::new(3).ok(),
            created_at: Timestamp::now(),
        }
    }

    fn task(id: u64, title: &str, status: TaskStatus, sprint: i64) -> ClientTask {
        ClientTask {
            id,
            client_id: 1,
            title: title.to_string(),
            details: None,
            status,
            sprint_key: SprintNumber::new(sprint).ok().map(SprintNumber::key),
            alteration_count: 0,
            admin_rejection_reason: None,
            admin_completion_link: None,
            template_plan_task_id: None,
            created_by: CreatedBy::Admin,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
            steps: vec![],
        }
    }

    #[test]
    fn test_summary_lists_non_empty_sections_in_order() {
        let board = SprintBoard::from_tasks(
            create_test_client(),
            vec![
                task(4, "Reels", TaskStatus::Alteration, 3),
                task(3, "Stories", TaskStatus::Done, 3),
                task(2, "Post antigo", TaskStatus::Done, 2),
                task(1, "Feed", TaskStatus::InProgress, 3),
            ],
        );
        let text = SprintSummary(&board).to_string();

        assert_eq!(
            text,
            "WEEKLY SCHEDULE - ACME\n\
             Sprint 3\n\
             \n\
             ✔ Delivered:\n\
             • Stories\n\
             \n\
             🔄 In production:\n\
             • Reels\n\
             • Feed\n\
             \n\
             Any adjustments, just reach out here. 👍"
        );
    }

    #[test]
    fn test_board_display_shows_every_column() {
        let board = SprintBoard::from_tasks(
            create_test_client(),
            vec![task(1, "Feed", TaskStatus::Queued, 3)],
        );
        let output = board.to_string();

        assert!(output.starts_with("# Acme · Sprint 3"));
        assert!(output.contains("## Backlog (0)"));
        assert!(output.contains("## Queued (1)"));
        assert!(output.contains("## Delivered (0)"));
    }
}
