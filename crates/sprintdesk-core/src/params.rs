//! Parameter structures for tracker operations.
//!
//! These are plain data carriers shared by every front end. The CLI wraps
//! them in clap `Args` structs and converts with `From`; the core never
//! depends on an interface framework.
//!
//! Raw user input (sprint numbers, statuses, links) arrives unparsed and is
//! checked by each struct's `validate` method before anything reaches the
//! store:
//!
//! ```rust
//! use sprintdesk_core::params::SetTaskStatus;
//!
//! let params = SetTaskStatus { id: 1, status: "alteration".into() };
//! assert!(params.validate().is_ok());
//!
//! let params = SetTaskStatus { id: 1, status: "paused".into() };
//! assert!(params.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TrackerError},
    models::{SprintNumber, TaskStatus},
};

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(
            TrackerError::invalid_input(field).with_reason(format!("{field} must not be empty"))
        );
    }
    Ok(())
}

/// Empty text means "clear"; anything else replaces.
fn text_change(value: &Option<String>) -> Option<Option<&str>> {
    value
        .as_deref()
        .map(|text| (!text.trim().is_empty()).then_some(text))
}

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Name of the plan (required)
    pub name: String,
    /// Optional description of what the plan includes
    pub description: Option<String>,
}

impl CreatePlan {
    pub fn validate(&self) -> Result<()> {
        required("name", &self.name)
    }
}

/// Parameters for renaming or describing a plan.
///
/// An empty description clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdatePlan {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            required("name", name)?;
        }
        Ok(())
    }

    /// Description change to apply, if any.
    pub fn description_change(&self) -> Option<Option<&str>> {
        text_change(&self.description)
    }
}

/// Parameters for adding a task template to a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlanTask {
    pub plan_id: u64,
    /// Sprint the template belongs to, 0 to 15
    pub sprint: i64,
    pub title: String,
    pub details: Option<String>,
}

impl CreatePlanTask {
    /// Validates the title and returns the parsed sprint.
    pub fn validate(&self) -> Result<SprintNumber> {
        required("title", &self.title)?;
        SprintNumber::new(self.sprint)
    }
}

/// Parameters for editing a task template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlanTask {
    pub id: u64,
    pub sprint: Option<i64>,
    pub title: Option<String>,
    /// Empty text clears the details
    pub details: Option<String>,
}

impl UpdatePlanTask {
    /// Validates the changes and returns the parsed sprint, if one was given.
    pub fn validate(&self) -> Result<Option<SprintNumber>> {
        if let Some(title) = &self.title {
            required("title", title)?;
        }
        self.sprint.map(SprintNumber::new).transpose()
    }

    pub fn details_change(&self) -> Option<Option<&str>> {
        text_change(&self.details)
    }
}

/// Parameters for adding a checklist step to a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddTemplateStep {
    pub plan_task_id: u64,
    pub title: String,
    /// Position in the checklist; appended after the last step when unset
    pub step_order: Option<i64>,
}

impl AddTemplateStep {
    pub fn validate(&self) -> Result<()> {
        required("title", &self.title)
    }
}

/// Parameters for creating a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateClient {
    pub name: String,
    /// Access code the client opens their board with
    pub slug: String,
}

impl CreateClient {
    /// Validates the fields and returns the trimmed slug.
    pub fn validate(&self) -> Result<&str> {
        required("name", &self.name)?;
        ResolveClient::trimmed(&self.slug)
    }
}

/// Parameters for looking a client up by access code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveClient {
    pub slug: String,
}

impl ResolveClient {
    /// Returns the trimmed slug.
    pub fn validate(&self) -> Result<&str> {
        Self::trimmed(&self.slug)
    }

    fn trimmed(slug: &str) -> Result<&str> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(
                TrackerError::invalid_input("slug").with_reason("Client code must not be empty")
            );
        }
        Ok(slug)
    }
}

/// Parameters for putting a client on a plan, or taking them off one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignPlan {
    pub client_id: u64,
    pub plan_id: Option<u64>,
}

/// Parameters for moving a client's sprint cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetSprint {
    pub client_id: u64,
    pub sprint: i64,
}

impl SetSprint {
    pub fn validate(&self) -> Result<SprintNumber> {
        SprintNumber::new(self.sprint)
    }
}

/// Parameters for generating a sprint's tasks for a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateSprintTasks {
    pub client_id: u64,
    pub plan_id: u64,
    pub sprint: i64,
}

impl GenerateSprintTasks {
    pub fn validate(&self) -> Result<SprintNumber> {
        SprintNumber::new(self.sprint)
    }
}

/// Parameters for a client submitting a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitTask {
    pub client_id: u64,
    pub title: String,
    pub details: Option<String>,
}

impl SubmitTask {
    pub fn validate(&self) -> Result<()> {
        required("title", &self.title)
    }
}

/// Parameters for changing a task's status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetTaskStatus {
    pub id: u64,
    /// One of suggested, queued, in_progress, alteration, done (or completed),
    /// rejected
    pub status: String,
}

impl SetTaskStatus {
    /// Parses the requested status; unknown values are rejected.
    pub fn validate(&self) -> Result<TaskStatus> {
        self.status.parse::<TaskStatus>().map_err(|_| {
            TrackerError::invalid_input("status").with_reason(format!(
                "Invalid status: {}. Must be one of queued, in_progress, alteration, done or rejected",
                self.status
            ))
        })
    }
}

/// Parameters for rejecting a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectTask {
    pub id: u64,
    /// May also be recorded later
    pub reason: Option<String>,
}

/// Parameters for recording why a task was rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetRejectionReason {
    pub id: u64,
    pub reason: String,
}

impl SetRejectionReason {
    pub fn validate(&self) -> Result<()> {
        required("reason", &self.reason)
    }
}

/// Parameters for attaching a delivery link to a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetCompletionLink {
    pub id: u64,
    /// `None` clears the link
    pub link: Option<String>,
}

impl SetCompletionLink {
    /// Returns the trimmed link, which must be an http(s) URL.
    pub fn validate(&self) -> Result<Option<&str>> {
        let Some(link) = self.link.as_deref().map(str::trim) else {
            return Ok(None);
        };

        let rest = link
            .strip_prefix("https://")
            .or_else(|| link.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(Some(link)),
            _ => Err(TrackerError::invalid_input("link")
                .with_reason(format!("'{link}' is not an http:// or https:// URL"))),
        }
    }
}

/// Parameters for ticking a checklist item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetStepDone {
    pub step_id: u64,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_task_status_accepts_known_statuses() {
        let params = SetTaskStatus {
            id: 1,
            status: "in_progress".into(),
        };
        assert_eq!(params.validate().unwrap(), TaskStatus::InProgress);

        let params = SetTaskStatus {
            id: 1,
            status: "completed".into(),
        };
        assert_eq!(params.validate().unwrap(), TaskStatus::Done);
    }

    #[test]
    fn test_set_task_status_rejects_unknown_values() {
        let params = SetTaskStatus {
            id: 1,
            status: "paused".into(),
        };

        match params.validate().unwrap_err() {
            TrackerError::InvalidInput { field, reason } => {
                assert_eq!(field, "status");
                assert!(reason.contains("Invalid status: paused"));
            }
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn test_sprint_must_be_in_range() {
        let params = GenerateSprintTasks {
            client_id: 1,
            plan_id: 1,
            sprint: 16,
        };
        assert!(params.validate().is_err());

        let params = SetSprint {
            client_id: 1,
            sprint: 15,
        };
        assert_eq!(params.validate().unwrap(), SprintNumber::LAST);
    }

    #[test]
    fn test_blank_names_are_rejected() {
        assert!(CreatePlan::default().validate().is_err());
        assert!(SubmitTask {
            client_id: 1,
            title: "   ".into(),
            details: None
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_client_slug_is_trimmed() {
        let params = CreateClient {
            name: "Acme".into(),
            slug: "  acme-2025 ".into(),
        };
        assert_eq!(params.validate().unwrap(), "acme-2025");

        let params = ResolveClient { slug: "  ".into() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_completion_link_must_be_http() {
        let link = |value: &str| SetCompletionLink {
            id: 1,
            link: Some(value.into()),
        };

        assert_eq!(
            link(" https://drive.example/abc ").validate().unwrap(),
            Some("https://drive.example/abc")
        );
        assert!(link("http://example.com").validate().is_ok());
        assert!(link("ftp://example.com").validate().is_err());
        assert!(link("https://").validate().is_err());
        assert!(link("drive.example").validate().is_err());
        assert_eq!(SetCompletionLink { id: 1, link: None }.validate().unwrap(), None);
    }

    #[test]
    fn test_empty_description_clears() {
        let params = UpdatePlan {
            id: 1,
            name: None,
            description: Some(String::new()),
        };
        assert_eq!(params.description_change(), Some(None));

        let params = UpdatePlan::default();
        assert_eq!(params.description_change(), None);
    }
}
