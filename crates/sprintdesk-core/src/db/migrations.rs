//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Brings stores written by older releases up to date.
    fn apply_migrations(&self) -> Result<()> {
        let has_completion_link: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('client_tasks') WHERE name = 'admin_completion_link'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .db_context("Failed to inspect client_tasks columns")?;

        if !has_completion_link {
            self.connection
                .execute(
                    "ALTER TABLE client_tasks ADD COLUMN admin_completion_link TEXT",
                    [],
                )
                .db_context("Failed to add admin_completion_link column to client_tasks")?;
        }

        // `completed` was written by earlier boards; `done` is canonical.
        let renamed = self
            .connection
            .execute(
                "UPDATE client_tasks SET status = 'done' WHERE status = 'completed'",
                [],
            )
            .db_context("Failed to normalize delivered task statuses")?;
        if renamed > 0 {
            log::info!("Normalized {renamed} task(s) from 'completed' to 'done'");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;

    #[test]
    fn test_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.db");

        Database::new(&path).unwrap();
        Database::new(&path).unwrap();
    }

    #[test]
    fn test_completed_rows_are_normalized_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");

        {
            let db = Database::new(&path).unwrap();
            db.connection
                .execute_batch(
                    "INSERT INTO clients (name, slug, created_at) VALUES ('Acme', 'acme', '2025-01-01T00:00:00Z');
                     INSERT INTO client_tasks (client_id, title, status, created_by, created_at, updated_at)
                     VALUES (1, 'Old', 'completed', 'admin', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z');",
                )
                .unwrap();
        }

        let db = Database::new(&path).unwrap();
        let status: String = db
            .connection
            .query_row("SELECT status FROM client_tasks WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(status, "done");
    }
}
