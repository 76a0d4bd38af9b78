//! Agency-wide dashboard figures.
//!
//! Everything here is computed in memory from full listings of clients,
//! client tasks and plan task templates.

use std::collections::{BTreeMap, HashMap};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::{Client, ClientTask, PlanTask, SprintNumber, TaskStatus};

/// How many clients the alteration ranking shows.
pub const TOP_ALTERATION_CLIENTS: usize = 5;

/// Folds a title for comparison: lowercase, accents stripped, whitespace
/// collapsed.
///
/// ```rust
/// use sprintdesk_core::metrics::normalize_title;
///
/// assert_eq!(normalize_title("  Ligação   de Alinhamento "), "ligacao de alinhamento");
/// ```
pub fn normalize_title(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A client with a count attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCount {
    pub client_id: u64,
    pub name: String,
    pub slug: String,
    pub count: u64,
}

/// A task listed among a client's current sprint deliverables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    pub task_id: u64,
    pub title: String,
    pub status: TaskStatus,
}

/// The deliverables of one client's current sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDeliverables {
    pub client_id: u64,
    pub name: String,
    pub slug: String,
    pub sprint: SprintNumber,
    /// One entry per normalized title, sorted by title
    pub tasks: Vec<Deliverable>,
}

/// Dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMetrics {
    pub total_clients: usize,
    /// Tasks that are not rejected
    pub total_tasks: usize,
    /// Tasks per status, over every task, in board order
    pub status_counts: Vec<(TaskStatus, usize)>,
    /// Alteration cycles over tasks that are not rejected
    pub total_alterations: u64,
    pub average_alterations: f64,
    /// Clients with the most alteration cycles, most first
    pub top_alterations: Vec<ClientCount>,
    /// Clients per current sprint, in sprint order
    pub clients_per_sprint: Vec<(SprintNumber, usize)>,
    /// Clients with deliverables in their current sprint, most first
    pub current_deliverables: Vec<ClientDeliverables>,
}

impl BoardMetrics {
    pub fn compute(clients: &[Client], tasks: &[ClientTask], plan_tasks: &[PlanTask]) -> Self {
        let clients_by_id: HashMap<u64, &Client> = clients.iter().map(|c| (c.id, c)).collect();

        let live: Vec<&ClientTask> = tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Rejected)
            .collect();
        let total_alterations: u64 = live.iter().map(|t| u64::from(t.alteration_count)).sum();
        let average_alterations = if live.is_empty() {
            0.0
        } else {
            total_alterations as f64 / live.len() as f64
        };

        let status_counts = TaskStatus::ALL
            .iter()
            .map(|status| (*status, tasks.iter().filter(|t| t.status == *status).count()))
            .filter(|(_, count)| *count > 0)
            .collect();

        let mut clients_per_sprint: BTreeMap<SprintNumber, usize> = BTreeMap::new();
        for client in clients {
            *clients_per_sprint.entry(client.sprint()).or_default() += 1;
        }

        Self {
            total_clients: clients.len(),
            total_tasks: live.len(),
            status_counts,
            total_alterations,
            average_alterations,
            top_alterations: top_alterations(&clients_by_id, tasks),
            clients_per_sprint: clients_per_sprint.into_iter().collect(),
            current_deliverables: current_deliverables(&clients_by_id, tasks, plan_tasks),
        }
    }

    /// Count for one status.
    pub fn count_of(&self, status: TaskStatus) -> usize {
        self.status_counts
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, count)| *count)
    }
}

fn top_alterations(clients: &HashMap<u64, &Client>, tasks: &[ClientTask]) -> Vec<ClientCount> {
    let mut per_client: HashMap<u64, u64> = HashMap::new();
    for task in tasks {
        *per_client.entry(task.client_id).or_default() += u64::from(task.alteration_count);
    }

    let mut ranked: Vec<ClientCount> = per_client
        .into_iter()
        .filter_map(|(client_id, count)| {
            let client = clients.get(&client_id)?;
            Some(ClientCount {
                client_id,
                name: client.name.clone(),
                slug: client.slug.clone(),
                count,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_ALTERATION_CLIENTS);
    ranked
}

fn current_deliverables(
    clients: &HashMap<u64, &Client>,
    tasks: &[ClientTask],
    plan_tasks: &[PlanTask],
) -> Vec<ClientDeliverables> {
    let sprint_by_template: HashMap<u64, SprintNumber> =
        plan_tasks.iter().map(|t| (t.id, t.sprint_number)).collect();

    // First template per (plan, title) wins.
    let mut sprint_by_plan_title: HashMap<(u64, String), SprintNumber> = HashMap::new();
    for template in plan_tasks {
        sprint_by_plan_title
            .entry((template.plan_id, normalize_title(&template.title)))
            .or_insert(template.sprint_number);
    }

    let mut newest: HashMap<u64, HashMap<String, &ClientTask>> = HashMap::new();
    for task in tasks {
        let Some(client) = clients.get(&task.client_id) else {
            continue;
        };
        let key = normalize_title(&task.title);
        let template_sprint = match task.template_plan_task_id {
            Some(id) => sprint_by_template.get(&id).copied(),
            None => client
                .plan_id
                .and_then(|plan_id| sprint_by_plan_title.get(&(plan_id, key.clone())).copied()),
        };
        if template_sprint != Some(client.sprint()) {
            continue;
        }

        let slot = newest.entry(task.client_id).or_default();
        let replace = slot.get(&key).map_or(true, |kept| !is_newer(kept, task));
        if replace {
            slot.insert(key, task);
        }
    }

    let mut result: Vec<ClientDeliverables> = newest
        .into_iter()
        .filter_map(|(client_id, by_title)| {
            let client = clients.get(&client_id)?;
            let mut tasks: Vec<Deliverable> = by_title
                .into_values()
                .map(|t| Deliverable {
                    task_id: t.id,
                    title: t.title.clone(),
                    status: t.status,
                })
                .collect();
            tasks.sort_by(|a, b| a.title.cmp(&b.title));
            Some(ClientDeliverables {
                client_id,
                name: client.name.clone(),
                slug: client.slug.clone(),
                sprint: client.sprint(),
                tasks,
            })
        })
        .collect();
    result.sort_by(|a, b| {
        b.tasks
            .len()
            .cmp(&a.tasks.len())
            .then_with(|| a.name.cmp(&b.name))
    });
    result
}

/// Whether `kept` is newer than `candidate`; ties go to the higher id.
fn is_newer(kept: &ClientTask, candidate: &ClientTask) -> bool {
    let rank = |t: &ClientTask| -> (Timestamp, u64) { (t.created_at, t.id) };
    rank(kept) > rank(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreatedBy;

    fn client(id: u64, name: &str, plan_id: Option<u64>, sprint: Option<i64>) -> Client {
        Client {
            id,
            name: name.into(),
            slug: name.to_lowercase(),
            plan_id,
            current_sprint: sprint.map(|s| SprintNumber::new(s).unwrap()),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn task(
        id: u64,
        client_id: u64,
        title: &str,
        status: TaskStatus,
        alterations: u32,
    ) -> ClientTask {
        ClientTask {
            id,
            client_id,
            title: title.into(),
            details: None,
            status,
            sprint_key: None,
            alteration_count: alterations,
            admin_rejection_reason: None,
            admin_completion_link: None,
            template_plan_task_id: None,
            created_by: CreatedBy::Admin,
            created_at: Timestamp::from_second(id as i64).unwrap(),
            updated_at: Timestamp::UNIX_EPOCH,
            steps: Vec::new(),
        }
    }

    fn template(id: u64, plan_id: u64, sprint: i64, title: &str) -> PlanTask {
        PlanTask {
            id,
            plan_id,
            sprint_number: SprintNumber::new(sprint).unwrap(),
            title: title.into(),
            details: None,
            created_at: Timestamp::UNIX_EPOCH,
            steps: Vec::new(),
        }
    }

    #[test]
    fn test_rejected_tasks_are_left_out_of_totals() {
        let clients = vec![client(1, "Acme", None, None)];
        let tasks = vec![
            task(1, 1, "A", TaskStatus::Queued, 1),
            task(2, 1, "B", TaskStatus::Alteration, 2),
            task(3, 1, "C", TaskStatus::Rejected, 5),
        ];

        let metrics = BoardMetrics::compute(&clients, &tasks, &[]);

        assert_eq!(metrics.total_clients, 1);
        assert_eq!(metrics.total_tasks, 2);
        assert_eq!(metrics.total_alterations, 3);
        assert!((metrics.average_alterations - 1.5).abs() < f64::EPSILON);
        assert_eq!(metrics.count_of(TaskStatus::Rejected), 1);
        assert_eq!(metrics.count_of(TaskStatus::Done), 0);
        // Rejected rework still counts toward the per-client ranking.
        assert_eq!(metrics.top_alterations[0].count, 8);
    }

    #[test]
    fn test_top_alterations_keeps_five_most() {
        let clients: Vec<Client> = (1..=7)
            .map(|id| client(id, &format!("Client {id}"), None, None))
            .collect();
        let tasks: Vec<ClientTask> = (1..=7)
            .map(|id| task(id, id, "Post", TaskStatus::Done, id as u32))
            .collect();

        let metrics = BoardMetrics::compute(&clients, &tasks, &[]);

        let counts: Vec<u64> = metrics.top_alterations.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_clients_per_sprint_treats_unset_as_onboarding() {
        let clients = vec![
            client(1, "A", None, None),
            client(2, "B", None, Some(0)),
            client(3, "C", None, Some(4)),
        ];

        let metrics = BoardMetrics::compute(&clients, &[], &[]);

        assert_eq!(
            metrics.clients_per_sprint,
            vec![(SprintNumber::ONBOARDING, 2), (SprintNumber::new(4).unwrap(), 1)]
        );
        assert_eq!(metrics.average_alterations, 0.0);
    }

    #[test]
    fn test_deliverables_match_template_sprint_and_keep_newest() {
        let clients = vec![client(1, "Acme", Some(10), Some(2))];
        let templates = vec![
            template(100, 10, 2, "Ligação de alinhamento"),
            template(101, 10, 3, "Relatório"),
        ];

        let mut by_template = task(1, 1, "Ligação de alinhamento", TaskStatus::Done, 0);
        by_template.template_plan_task_id = Some(100);
        let by_title = task(2, 1, "ligacao  de alinhamento", TaskStatus::Queued, 0);
        let other_sprint = task(3, 1, "Relatório", TaskStatus::Queued, 0);
        let unmapped = task(4, 1, "Banner avulso", TaskStatus::Queued, 0);

        let metrics = BoardMetrics::compute(
            &clients,
            &[by_template, by_title, other_sprint, unmapped],
            &templates,
        );

        assert_eq!(metrics.current_deliverables.len(), 1);
        let acme = &metrics.current_deliverables[0];
        assert_eq!(acme.sprint.get(), 2);
        assert_eq!(acme.tasks.len(), 1);
        assert_eq!(acme.tasks[0].task_id, 2);
        assert_eq!(acme.tasks[0].status, TaskStatus::Queued);
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Otimização do Cardápio"), "otimizacao do cardapio");
        assert_eq!(normalize_title("\tA \n B  "), "a b");
    }
}
