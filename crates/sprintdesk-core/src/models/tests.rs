#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;

    use crate::models::{
        Client, ClientTask, ClientTaskStep, CreatedBy, Plan, PlanTask, PlanTaskStep, SprintBoard,
        SprintKey, SprintNumber, TaskStatus,
    };

    fn ts() -> Timestamp {
        Timestamp::from_second(1_735_689_600).unwrap() // 2025-01-01 00:00:00 UTC
    }

    fn create_test_client(sprint: i64) -> Client {
        Client {
            id: 10,
            name: "Padaria Sol".to_string(),
            slug: "sol".to_string(),
            plan_id: Some(1),
            current_sprint: Some(SprintNumber::new(sprint).unwrap()),
            created_at: ts(),
        }
    }

    fn create_test_task(id: u64, status: TaskStatus, sprint_key: Option<&str>) -> ClientTask {
        ClientTask {
            id,
            client_id: 10,
            title: format!("Task {id}"),
            details: Some("Arte para o feed".to_string()),
            status,
            sprint_key: sprint_key.map(|k| k.parse().unwrap()),
            alteration_count: 0,
            admin_rejection_reason: None,
            admin_completion_link: None,
            template_plan_task_id: None,
            created_by: CreatedBy::Client,
            created_at: ts(),
            updated_at: ts(),
            steps: vec![],
        }
    }

    fn create_template(id: u64, sprint: i64, title: &str) -> PlanTask {
        PlanTask {
            id,
            plan_id: 1,
            sprint_number: SprintNumber::new(sprint).unwrap(),
            title: title.to_string(),
            details: None,
            created_at: ts(),
            steps: vec![],
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("queued".parse::<TaskStatus>(), Ok(TaskStatus::Queued));
        assert_eq!(" In_Progress ".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert!("paused".parse::<TaskStatus>().is_err());

        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn test_stored_status_falls_back_to_queued() {
        assert_eq!(TaskStatus::from_stored("completed"), TaskStatus::Done);
        assert_eq!(TaskStatus::from_stored("archived"), TaskStatus::Queued);
    }

    #[test]
    fn test_status_serde_accepts_legacy_alias() {
        let status: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, TaskStatus::Done);
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in_progress\"");
    }

    #[test]
    fn test_created_by_round_trip() {
        assert_eq!("client".parse::<CreatedBy>(), Ok(CreatedBy::Client));
        assert_eq!(CreatedBy::Admin.to_string(), "admin");
        assert!("robot".parse::<CreatedBy>().is_err());
    }

    #[test]
    fn test_unset_sprint_reads_as_onboarding() {
        let mut client = create_test_client(0);
        client.current_sprint = None;
        assert_eq!(client.sprint(), SprintNumber::ONBOARDING);
        assert_eq!(client.active_sprint_key().to_string(), "sprint-0");
    }

    #[test]
    fn test_board_groups_active_sprint() {
        let tasks = vec![
            create_test_task(7, TaskStatus::Suggested, None),
            create_test_task(6, TaskStatus::Done, Some("sprint-2")),
            create_test_task(5, TaskStatus::Alteration, Some("sprint-2")),
            create_test_task(4, TaskStatus::InProgress, Some("sprint-2")),
            create_test_task(3, TaskStatus::Queued, Some("sprint-2")),
            create_test_task(2, TaskStatus::Queued, Some("sprint-1")),
            create_test_task(1, TaskStatus::Rejected, Some("sprint-2")),
        ];
        let board = SprintBoard::from_tasks(create_test_client(2), tasks);

        assert_eq!(board.sprint_key, SprintKey::Numbered(SprintNumber::new(2).unwrap()));
        assert_eq!(board.backlog.iter().map(|t| t.id).collect::<Vec<_>>(), vec![7]);
        assert_eq!(board.queued.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(
            board.in_production.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![5, 4]
        );
        assert_eq!(board.delivered.iter().map(|t| t.id).collect::<Vec<_>>(), vec![6]);
        assert_eq!(board.sprint_len(), 4);
    }

    #[test]
    fn test_legacy_calendar_tasks_stay_off_the_board() {
        let tasks = vec![create_test_task(1, TaskStatus::Queued, Some("2025-48"))];
        let board = SprintBoard::from_tasks(create_test_client(0), tasks);
        assert_eq!(board.sprint_len(), 0);
    }

    #[test]
    fn test_plan_groups_templates_by_sprint() {
        let plan = Plan {
            id: 1,
            name: "Gold".to_string(),
            description: Some("Social media".to_string()),
            created_at: ts(),
            updated_at: ts(),
            tasks: vec![
                create_template(3, 2, "Relatório"),
                create_template(1, 0, "Kickoff"),
                create_template(2, 2, "Carrossel"),
            ],
        };

        let groups = plan.tasks_by_sprint();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, SprintNumber::ONBOARDING);
        assert_eq!(groups[1].1.len(), 2);

        let output = plan.to_string();
        assert!(output.starts_with("# 1. Gold"));
        assert!(output.contains("## Sprint 0"));
        assert!(output.contains("### 2. Carrossel"));
        let sprint0 = output.find("## Sprint 0").unwrap();
        let sprint2 = output.find("## Sprint 2").unwrap();
        assert!(sprint0 < sprint2);
    }

    #[test]
    fn test_template_step_display() {
        let mut template = create_template(5, 1, "Post");
        template.steps = vec![
            PlanTaskStep {
                id: 1,
                plan_task_id: 5,
                step_order: 1,
                title: "Coletar dados".to_string(),
            },
            PlanTaskStep {
                id: 2,
                plan_task_id: 5,
                step_order: 2,
                title: "Validar".to_string(),
            },
        ];

        let output = template.to_string();
        assert!(output.contains("Sprint 1 of plan 1"));
        assert!(output.contains("1. Coletar dados (step 1)"));
        assert!(output.contains("2. Validar (step 2)"));
    }

    #[test]
    fn test_task_display_shows_checklist_progress() {
        let mut task = create_test_task(3, TaskStatus::Done, Some("sprint-2"));
        task.alteration_count = 2;
        task.admin_completion_link = Some("https://drive.example/x".to_string());
        task.steps = vec![
            ClientTaskStep {
                id: 1,
                task_id: 3,
                step_order: 1,
                title: "Coletar dados".to_string(),
                done: true,
            },
            ClientTaskStep {
                id: 2,
                task_id: 3,
                step_order: 2,
                title: "Validar".to_string(),
                done: false,
            },
        ];

        let output = task.to_string();
        assert!(output.contains("### 3. Task 3 (✓ Delivered)"));
        assert!(output.contains("- Sprint: Sprint 2"));
        assert!(output.contains("- Alterations: 2"));
        assert!(output.contains("#### Checklist (1/2)"));
        assert!(output.contains("- [x] Coletar dados"));
        assert!(output.contains("- [ ] Validar"));
        assert!(output.contains("https://drive.example/x"));
    }

    #[test]
    fn test_backlog_task_display() {
        let output = create_test_task(1, TaskStatus::Suggested, None).to_string();
        assert!(output.contains("- Sprint: backlog"));
        assert!(output.contains("- Requested by: client"));
        assert!(!output.contains("Alterations"));
    }
}
