//! Client operations and slug resolution.

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension, TransactionBehavior};

use super::{id_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{Client, SprintNumber},
};

const CLIENT_COLUMNS: &str = "id, name, slug, plan_id, current_sprint, created_at";
const INSERT_CLIENT_SQL: &str =
    "INSERT INTO clients (name, slug, plan_id, current_sprint, created_at) VALUES (?1, ?2, NULL, NULL, ?3)";
const CHECK_SLUG_TAKEN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM clients WHERE slug = ?1)";
const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";
const UPDATE_CLIENT_PLAN_SQL: &str = "UPDATE clients SET plan_id = ?1 WHERE id = ?2";
const UPDATE_CLIENT_SPRINT_SQL: &str = "UPDATE clients SET current_sprint = ?1 WHERE id = ?2";

pub(crate) fn client_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    let current_sprint = row
        .get::<_, Option<i64>>(4)?
        .map(SprintNumber::new)
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, e.to_string().into())
        })?;

    Ok(Client {
        id: id_at(row, 0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        plan_id: row.get::<_, Option<i64>>(3)?.map(|id| id as u64),
        current_sprint,
        created_at: timestamp_at(row, 5)?,
    })
}

pub(crate) fn select_client(conn: &Connection, id: u64) -> Result<Option<Client>> {
    let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
    conn.query_row(&sql, params![id as i64], client_from_row)
        .optional()
        .db_context("Failed to query client")
}

/// Persists a client's sprint cursor.
pub(crate) fn update_current_sprint(
    conn: &Connection,
    client_id: u64,
    sprint: SprintNumber,
) -> rusqlite::Result<usize> {
    conn.execute(
        UPDATE_CLIENT_SPRINT_SQL,
        params![i64::from(sprint.get()), client_id as i64],
    )
}

impl super::Database {
    /// Creates a client. The slug must not already be in use.
    pub fn create_client(&mut self, name: &str, slug: &str) -> Result<Client> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let taken: bool = tx
            .query_row(CHECK_SLUG_TAKEN_SQL, params![slug], |row| row.get(0))
            .db_context("Failed to check client slug")?;
        if taken {
            return Err(TrackerError::DuplicateClientSlug { slug: slug.into() });
        }

        let now = Timestamp::now();
        tx.execute(INSERT_CLIENT_SQL, params![name, slug, now.to_string()])
            .db_context("Failed to insert client")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Client {
            id,
            name: name.into(),
            slug: slug.into(),
            plan_id: None,
            current_sprint: None,
            created_at: now,
        })
    }

    /// Retrieves a client by ID.
    pub fn get_client(&self, id: u64) -> Result<Option<Client>> {
        select_client(&self.connection, id)
    }

    /// Lists all clients by name.
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name COLLATE NOCASE, id");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let clients = stmt
            .query_map([], client_from_row)
            .db_context("Failed to query clients")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch clients")?;

        Ok(clients)
    }

    /// Finds the one client using `slug`.
    ///
    /// No match and several matches are distinct errors; an ambiguous slug
    /// never resolves to an arbitrary client.
    pub fn resolve_client(&self, slug: &str) -> Result<Client> {
        let sql =
            format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE slug = ?1 ORDER BY id LIMIT 2");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let mut matches = stmt
            .query_map(params![slug], client_from_row)
            .db_context("Failed to query client by slug")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to fetch client by slug")?;

        match matches.len() {
            0 => Err(TrackerError::ClientSlugNotFound { slug: slug.into() }),
            1 => Ok(matches.remove(0)),
            _ => {
                log::warn!("Client code '{slug}' is shared by more than one client");
                Err(TrackerError::DuplicateClientSlug { slug: slug.into() })
            }
        }
    }

    /// Sets or clears the plan a client is on.
    pub fn assign_plan(&mut self, client_id: u64, plan_id: Option<u64>) -> Result<Client> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if let Some(plan_id) = plan_id {
            let exists: bool = tx
                .query_row(CHECK_PLAN_EXISTS_SQL, params![plan_id as i64], |row| {
                    row.get(0)
                })
                .db_context("Failed to check plan existence")?;
            if !exists {
                return Err(TrackerError::PlanNotFound { id: plan_id });
            }
        }

        let rows = tx
            .execute(
                UPDATE_CLIENT_PLAN_SQL,
                params![plan_id.map(|id| id as i64), client_id as i64],
            )
            .db_context("Failed to update client plan")?;
        if rows == 0 {
            return Err(TrackerError::ClientNotFound { id: client_id });
        }

        let client =
            select_client(&tx, client_id)?.ok_or(TrackerError::ClientNotFound { id: client_id })?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(client)
    }

    /// Moves a client's sprint cursor without generating anything.
    pub fn set_current_sprint(&mut self, client_id: u64, sprint: SprintNumber) -> Result<Client> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows = update_current_sprint(&tx, client_id, sprint)
            .db_context("Failed to update client sprint")?;
        if rows == 0 {
            return Err(TrackerError::ClientNotFound { id: client_id });
        }

        let client =
            select_client(&tx, client_id)?.ok_or(TrackerError::ClientNotFound { id: client_id })?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;
    use crate::{error::TrackerError, models::SprintNumber};

    #[test]
    fn test_resolve_client_by_slug() {
        let mut db = Database::in_memory().unwrap();
        let acme = db.create_client("Acme", "acme-2025").unwrap();

        assert_eq!(db.resolve_client("acme-2025").unwrap().id, acme.id);
        assert!(matches!(
            db.resolve_client("nope"),
            Err(TrackerError::ClientSlugNotFound { .. })
        ));
    }

    #[test]
    fn test_create_refuses_taken_slug() {
        let mut db = Database::in_memory().unwrap();
        db.create_client("Acme", "acme").unwrap();

        assert!(matches!(
            db.create_client("Acme Two", "acme"),
            Err(TrackerError::DuplicateClientSlug { .. })
        ));
    }

    #[test]
    fn test_shared_slug_is_surfaced() {
        let mut db = Database::in_memory().unwrap();
        db.create_client("Acme", "acme").unwrap();
        db.connection
            .execute(
                "INSERT INTO clients (name, slug, created_at) VALUES ('Acme Imported', 'acme', '2025-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        match db.resolve_client("acme") {
            Err(TrackerError::DuplicateClientSlug { slug }) => assert_eq!(slug, "acme"),
            other => panic!("expected duplicate slug error, got {other:?}"),
        }
    }

    #[test]
    fn test_assign_plan_and_sprint() {
        let mut db = Database::in_memory().unwrap();
        let client = db.create_client("Acme", "acme").unwrap();
        let plan = db.create_plan("Social", None).unwrap();

        let client = db.assign_plan(client.id, Some(plan.id)).unwrap();
        assert_eq!(client.plan_id, Some(plan.id));
        assert_eq!(client.current_sprint, None);

        let client = db
            .set_current_sprint(client.id, SprintNumber::new(4).unwrap())
            .unwrap();
        assert_eq!(client.sprint().get(), 4);
        assert_eq!(client.active_sprint_key().to_string(), "sprint-4");

        assert!(matches!(
            db.assign_plan(client.id, Some(999)),
            Err(TrackerError::PlanNotFound { id: 999 })
        ));
        assert!(matches!(
            db.set_current_sprint(999, SprintNumber::LAST),
            Err(TrackerError::ClientNotFound { id: 999 })
        ));
    }

    #[test]
    fn test_deleting_plan_detaches_clients() {
        let mut db = Database::in_memory().unwrap();
        let client = db.create_client("Acme", "acme").unwrap();
        let plan = db.create_plan("Social", None).unwrap();
        db.assign_plan(client.id, Some(plan.id)).unwrap();

        db.delete_plan(plan.id).unwrap();

        assert_eq!(db.get_client(client.id).unwrap().unwrap().plan_id, None);
    }
}
