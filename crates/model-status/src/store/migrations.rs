use super::StatusStore;
use crate::error::Result;

impl StatusStore {
    // ── Migrations ──────────────────────────────────────────────

    pub(crate) async fn run_migrations(&self) -> Result<()> {
        let table = &self.config.status_table;
        let key = &self.config.owner_key_column;

        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                model_type  TEXT NOT NULL,
                {key}       INTEGER NOT NULL,
                name        TEXT NOT NULL,
                value       TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )"
        ))
        .execute(&self.pool)
        .await?;

        // Upsert target: one row per (owner, name)
        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_owner_name
             ON {table}(model_type, {key}, name)"
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_name_value
             ON {table}(model_type, name, value)"
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
