//! Tests for the tracker module.

use tempfile::TempDir;

use super::*;
use crate::{
    models::TaskStatus,
    params::{
        AssignPlan, CreateClient, CreatePlan, CreatePlanTask, Id, ResolveClient, SetCompletionLink,
        SetTaskStatus, SubmitTask, UpdatePlanTask,
    },
};

async fn create_test_tracker() -> (TempDir, Tracker) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create tracker");
    (temp_dir, tracker)
}

#[tokio::test]
async fn test_builder_creates_nested_directories() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("a").join("b").join("desk.db");

    let tracker = TrackerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .unwrap();

    assert!(db_path.exists());
    assert_eq!(tracker.database_path(), db_path.as_path());
}

#[tokio::test]
async fn test_validation_happens_before_the_store() {
    let (_dir, tracker) = create_test_tracker().await;

    let err = tracker
        .create_plan(&CreatePlan {
            name: "  ".into(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput { .. }));

    let err = tracker
        .set_task_status(&SetTaskStatus {
            id: 1,
            status: "paused".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_client_is_resolved_by_trimmed_slug() {
    let (_dir, tracker) = create_test_tracker().await;
    let client = tracker
        .create_client(&CreateClient {
            name: "Acme".into(),
            slug: " acme ".into(),
        })
        .await
        .unwrap();
    assert_eq!(client.slug, "acme");

    let resolved = tracker
        .resolve_client(&ResolveClient {
            slug: "acme  ".into(),
        })
        .await
        .unwrap();
    assert_eq!(resolved.id, client.id);
}

#[tokio::test]
async fn test_template_can_move_between_sprints() {
    let (_dir, tracker) = create_test_tracker().await;
    let plan = tracker
        .create_plan(&CreatePlan {
            name: "Gold".into(),
            description: None,
        })
        .await
        .unwrap();
    let template = tracker
        .create_plan_task(&CreatePlanTask {
            plan_id: plan.id,
            sprint: 1,
            title: "Post".into(),
            details: Some("Feed".into()),
        })
        .await
        .unwrap();

    let moved = tracker
        .update_plan_task(&UpdatePlanTask {
            id: template.id,
            sprint: Some(2),
            title: None,
            details: Some(String::new()),
        })
        .await
        .unwrap();
    assert_eq!(moved.sprint_number.get(), 2);
    assert_eq!(moved.details, None);

    let err = tracker
        .update_plan_task(&UpdatePlanTask {
            id: template.id,
            sprint: Some(16),
            title: None,
            details: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_board_reflects_task_flow() {
    let (_dir, tracker) = create_test_tracker().await;
    let client = tracker
        .create_client(&CreateClient {
            name: "Acme".into(),
            slug: "acme".into(),
        })
        .await
        .unwrap();
    let plan = tracker
        .create_plan(&CreatePlan {
            name: "Gold".into(),
            description: None,
        })
        .await
        .unwrap();
    tracker
        .assign_plan(&AssignPlan {
            client_id: client.id,
            plan_id: Some(plan.id),
        })
        .await
        .unwrap();

    let request = tracker
        .submit_task(&SubmitTask {
            client_id: client.id,
            title: "Banner".into(),
            details: None,
        })
        .await
        .unwrap();
    let board = tracker.sprint_board(&Id { id: client.id }).await.unwrap();
    assert_eq!(board.backlog.len(), 1);
    assert_eq!(board.sprint_len(), 0);

    tracker.approve_task(&Id { id: request.id }).await.unwrap();
    tracker
        .set_task_status(&SetTaskStatus {
            id: request.id,
            status: "done".into(),
        })
        .await
        .unwrap();
    let delivered = tracker
        .set_completion_link(&SetCompletionLink {
            id: request.id,
            link: Some("https://drive.example/banner".into()),
        })
        .await
        .unwrap();
    assert_eq!(delivered.status, TaskStatus::Done);

    let board = tracker.sprint_board(&Id { id: client.id }).await.unwrap();
    assert!(board.backlog.is_empty());
    assert_eq!(board.delivered.len(), 1);
    assert_eq!(board.sprint_key.to_string(), "sprint-0");
}

#[tokio::test]
async fn test_missing_client_board() {
    let (_dir, tracker) = create_test_tracker().await;
    let err = tracker.sprint_board(&Id { id: 9 }).await.unwrap_err();
    assert!(matches!(err, TrackerError::ClientNotFound { id: 9 }));
}
