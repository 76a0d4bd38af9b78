//! Display for sprint generation outcomes and dashboard metrics.

use std::fmt;

use crate::{
    generation::{AdvanceOutcome, GenerationOutcome},
    metrics::BoardMetrics,
};

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)
    }
}

impl fmt::Display for AdvanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)
    }
}

impl fmt::Display for BoardMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Dashboard")?;
        writeln!(f)?;
        writeln!(f, "- **Clients**: {}", self.total_clients)?;
        writeln!(f, "- **Tasks**: {} (rejected excluded)", self.total_tasks)?;
        writeln!(
            f,
            "- **Alterations**: {} ({:.2} per task)",
            self.total_alterations, self.average_alterations
        )?;

        writeln!(f, "\n## Tasks by status")?;
        writeln!(f)?;
        writeln!(f, "| Status | Tasks |")?;
        writeln!(f, "|:-|-:|")?;
        for (status, count) in &self.status_counts {
            writeln!(f, "| {} | {count} |", status.with_icon())?;
        }

        if !self.top_alterations.is_empty() {
            writeln!(f, "\n## Most alterations")?;
            writeln!(f)?;
            for (rank, client) in self.top_alterations.iter().enumerate() {
                writeln!(
                    f,
                    "{}. {} ({}): {}",
                    rank + 1,
                    client.name,
                    client.slug,
                    client.count
                )?;
            }
        }

        if !self.clients_per_sprint.is_empty() {
            writeln!(f, "\n## Clients per sprint")?;
            writeln!(f)?;
            for (sprint, count) in &self.clients_per_sprint {
                writeln!(f, "- {}: {count}", sprint.key().label())?;
            }
        }

        if !self.current_deliverables.is_empty() {
            writeln!(f, "\n## Current sprint deliverables")?;
            for client in &self.current_deliverables {
                writeln!(f)?;
                writeln!(f, "### {} (Sprint {})", client.name, client.sprint)?;
                writeln!(f)?;
                for task in &client.tasks {
                    writeln!(f, "- {} ({})", task.title, task.status.with_icon())?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SprintNumber;

    #[test]
    fn test_outcome_display_is_the_message() {
        assert_eq!(
            GenerationOutcome::created(2).to_string(),
            "2 task(s) created\n"
        );
        assert_eq!(
            AdvanceOutcome::at_ceiling(SprintNumber::LAST).to_string(),
            "client is already at sprint 15 (the last sprint)\n"
        );
    }

    #[test]
    fn test_empty_dashboard() {
        let metrics = BoardMetrics::compute(&[], &[], &[]);
        let output = metrics.to_string();

        assert!(output.contains("- **Clients**: 0"));
        assert!(output.contains("(0.00 per task)"));
        assert!(!output.contains("## Most alterations"));
    }
}
