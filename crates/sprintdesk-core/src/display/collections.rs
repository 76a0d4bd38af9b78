//! Collection wrappers for displaying groups of domain objects.
//!
//! Each wrapper formats its items one after another and prints a short
//! notice when the collection is empty.

use std::fmt;

use crate::models::{Client, ClientTask, Plan, PlanTask};

/// Newtype wrapper for displaying a list of plans.
///
/// Plans are listed as one-line summaries with their template count rather
/// than in full.
///
/// # Examples
///
/// ```rust
/// use sprintdesk_core::{display::Plans, models::Plan};
/// use jiff::Timestamp;
///
/// let plan = Plan {
///     id: 1,
///     name: "Gold".to_string(),
///     description: Some("Monthly social media".to_string()),
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
///     tasks: vec![],
/// };
///
/// let output = Plans(vec![plan]).to_string();
/// assert!(output.contains("Gold"));
/// assert_eq!(Plans(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct Plans(pub Vec<Plan>);

impl Plans {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Plan> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Plans {
    type Item = &'a Plan;
    type IntoIter = std::slice::Iter<'a, Plan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }

        for plan in &self.0 {
            writeln!(f, "## {} (ID: {})", plan.name, plan.id)?;
            writeln!(f)?;
            if let Some(desc) = &plan.description {
                writeln!(f, "- **Description**: {desc}")?;
            }
            writeln!(f, "- **Templates**: {}", plan.tasks.len())?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the task templates of a plan.
pub struct PlanTasks(pub Vec<PlanTask>);

impl PlanTasks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for PlanTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No task templates found.");
        }

        for task in &self.0 {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a list of clients.
pub struct Clients(pub Vec<Client>);

impl Clients {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Client> {
        self.0.iter()
    }
}

impl fmt::Display for Clients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No clients found.");
        }

        for client in &self.0 {
            write!(f, "{client}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a list of client tasks.
///
/// # Examples
///
/// ```rust
/// use sprintdesk_core::display::ClientTasks;
///
/// assert!(ClientTasks(vec![]).to_string().contains("No tasks found."));
/// ```
pub struct ClientTasks(pub Vec<ClientTask>);

impl ClientTasks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClientTask> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ClientTasks {
    type Item = &'a ClientTask;
    type IntoIter = std::slice::Iter<'a, ClientTask>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ClientTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }

        for task in &self.0 {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}
