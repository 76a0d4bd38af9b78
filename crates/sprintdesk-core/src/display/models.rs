//! Display implementations for domain models.
//!
//! These live apart from the model definitions. Output is markdown for the
//! terminal renderer: headings per resource, a metadata list, then free text.

use std::fmt;

use super::datetime::{LocalDate, LocalDateTime};
use crate::models::{
    Client, ClientTask, ClientTaskStep, CreatedBy, Plan, PlanTask, PlanTaskStep, TaskStatus,
};

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for CreatedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        let sprints = self.tasks_by_sprint();
        if sprints.is_empty() {
            writeln!(f, "\nNo task templates in this plan.")?;
            return Ok(());
        }

        for (sprint, tasks) in sprints {
            writeln!(f, "\n## {}", sprint.key().label())?;
            writeln!(f)?;
            for task in tasks {
                task.fmt_template(f)?;
            }
        }

        Ok(())
    }
}

impl PlanTask {
    /// Compact form used both standalone and inside a plan.
    fn fmt_template(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {}", self.id, self.title)?;
        writeln!(f)?;

        if let Some(details) = &self.details {
            writeln!(f, "{details}")?;
            writeln!(f)?;
        }

        if !self.steps.is_empty() {
            for step in &self.steps {
                write!(f, "{step}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for PlanTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "_{} of plan {}_", self.sprint_number.key().label(), self.plan_id)?;
        writeln!(f)?;
        self.fmt_template(f)
    }
}

impl fmt::Display for PlanTaskStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}. {} (step {})", self.step_order, self.title, self.id)
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Access code**: {}", self.slug)?;
        match self.plan_id {
            Some(plan_id) => writeln!(f, "- **Plan**: {plan_id}")?,
            None => writeln!(f, "- **Plan**: none")?,
        }
        writeln!(f, "- **Sprint**: {}", self.active_sprint_key().label())?;
        writeln!(f, "- **Since**: {}", LocalDate(&self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for ClientTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.id,
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        match &self.sprint_key {
            Some(key) => writeln!(f, "- Sprint: {}", key.label())?,
            None => writeln!(f, "- Sprint: backlog")?,
        }
        writeln!(f, "- Requested by: {}", self.created_by)?;
        if self.alteration_count > 0 {
            writeln!(f, "- Alterations: {}", self.alteration_count)?;
        }
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)?;

        if let Some(details) = &self.details {
            writeln!(f, "{details}")?;
            writeln!(f)?;
        }

        if !self.steps.is_empty() {
            writeln!(
                f,
                "#### Checklist ({}/{})",
                self.completed_steps(),
                self.steps.len()
            )?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
            writeln!(f)?;
        }

        if self.status == TaskStatus::Rejected {
            if let Some(reason) = &self.admin_rejection_reason {
                writeln!(f, "#### Rejection reason")?;
                writeln!(f)?;
                writeln!(f, "{reason}")?;
                writeln!(f)?;
            }
        }

        if self.status.is_delivered() {
            if let Some(link) = &self.admin_completion_link {
                writeln!(f, "#### Delivery")?;
                writeln!(f)?;
                writeln!(f, "{link}")?;
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ClientTaskStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.done { "x" } else { " " };
        writeln!(f, "- [{mark}] {} (step {})", self.title, self.id)
    }
}
