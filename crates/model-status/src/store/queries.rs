use super::StatusStore;
use crate::error::Result;
use crate::types::{OwnerRef, Status};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, Row};
use tracing::debug;

impl StatusStore {
    /// Column list shared by every status SELECT; the key column is
    /// aliased so rows decode the same whatever it is called.
    fn status_columns(&self) -> String {
        format!(
            "id, model_type, {} AS owner_id, name, value, created_at, updated_at",
            self.config.owner_key_column
        )
    }

    /// `SELECT .. FROM table WHERE <owner>` with the owner bound.
    fn owner_query(&self, owner: &OwnerRef) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE model_type = ",
            self.status_columns(),
            self.config.status_table
        ));
        qb.push_bind(owner.owner_type.clone());
        qb.push(format!(" AND {} = ", self.config.owner_key_column));
        qb.push_bind(owner.owner_id);
        qb
    }

    // ── Reads ───────────────────────────────────────────────────

    /// All rows of `owner`, newest first.
    pub(crate) async fn fetch_statuses(&self, owner: &OwnerRef) -> Result<Vec<Status>> {
        let mut qb = self.owner_query(owner);
        qb.push(" ORDER BY id DESC");
        let rows = qb.build().fetch_all(&self.pool).await?;

        rows.iter().map(Self::row_to_status).collect()
    }

    /// Newest row of `owner` whose name is in `names` (any name if empty).
    pub(crate) async fn fetch_latest(
        &self,
        owner: &OwnerRef,
        names: &[&str],
    ) -> Result<Option<Status>> {
        let mut qb = self.owner_query(owner);
        if !names.is_empty() {
            qb.push(" AND name IN (");
            let mut sep = qb.separated(", ");
            for name in names {
                sep.push_bind(name.to_string());
            }
            sep.push_unseparated(")");
        }
        qb.push(" ORDER BY id DESC LIMIT 1");
        let row = qb.build().fetch_optional(&self.pool).await?;

        row.as_ref().map(Self::row_to_status).transpose()
    }

    /// Whether `owner` has any row named `name`.
    pub(crate) async fn fetch_has_status(&self, owner: &OwnerRef, name: &str) -> Result<bool> {
        let row = sqlx::query(&format!(
            "SELECT EXISTS(
                SELECT 1 FROM {} WHERE model_type = ?1 AND {} = ?2 AND name = ?3
             ) AS present",
            self.config.status_table, self.config.owner_key_column
        ))
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get::<i64, _>("present")? != 0)
    }

    /// Owner ids of `owner_type` whose newest `name` row has a value in `values`.
    pub(crate) async fn fetch_current_owner_ids(
        &self,
        owner_type: &str,
        name: &str,
        values: &[&str],
    ) -> Result<Vec<i64>> {
        let table = &self.config.status_table;
        let key = &self.config.owner_key_column;

        let mut qb: QueryBuilder<'static, Sqlite> = QueryBuilder::new(format!(
            "SELECT s.{key} AS owner_id FROM {table} s WHERE s.model_type = "
        ));
        qb.push_bind(owner_type.to_string());
        qb.push(" AND s.name = ");
        qb.push_bind(name.to_string());
        qb.push(" AND s.value IN (");
        {
            let mut sep = qb.separated(", ");
            for value in values {
                sep.push_bind(value.to_string());
            }
            sep.push_unseparated(")");
        }
        qb.push(format!(
            " AND s.id = (
                SELECT MAX(l.id) FROM {table} l
                WHERE l.model_type = s.model_type AND l.{key} = s.{key} AND l.name = s.name
             )
             ORDER BY s.{key}"
        ));

        let rows = qb.build().fetch_all(&self.pool).await?;
        debug!(owner_type, name, matches = rows.len(), "current status scope");

        rows.iter()
            .map(|r| r.try_get::<i64, _>("owner_id").map_err(Into::into))
            .collect()
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Insert or overwrite the `(owner, name)` row in one statement.
    pub(crate) async fn upsert_status(
        &self,
        owner: &OwnerRef,
        name: &str,
        value: Option<&str>,
    ) -> Result<Status> {
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(&format!(
            "INSERT INTO {table} (model_type, {key}, name, value, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(model_type, {key}, name) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
             RETURNING {columns}",
            table = self.config.status_table,
            key = self.config.owner_key_column,
            columns = self.status_columns(),
        ))
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .bind(name)
        .bind(value)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let status = Self::row_to_status(&row)?;
        debug!(owner = %owner, status = %status, id = status.id, "status upserted");
        Ok(status)
    }

    /// Delete rows of `owner` whose name is in `names`. `names` must be non-empty.
    pub(crate) async fn delete_statuses(&self, owner: &OwnerRef, names: &[&str]) -> Result<u64> {
        let mut qb: QueryBuilder<'static, Sqlite> = QueryBuilder::new(format!(
            "DELETE FROM {} WHERE model_type = ",
            self.config.status_table
        ));
        qb.push_bind(owner.owner_type.clone());
        qb.push(format!(" AND {} = ", self.config.owner_key_column));
        qb.push_bind(owner.owner_id);
        qb.push(" AND name IN (");
        {
            let mut sep = qb.separated(", ");
            for name in names {
                sep.push_bind(name.to_string());
            }
            sep.push_unseparated(")");
        }

        let deleted = qb.build().execute(&self.pool).await?.rows_affected();
        debug!(owner = %owner, ?names, deleted, "statuses deleted");
        Ok(deleted)
    }

    /// Delete every row of `owner`.
    pub(crate) async fn delete_all_statuses(&self, owner: &OwnerRef) -> Result<u64> {
        let deleted = sqlx::query(&format!(
            "DELETE FROM {} WHERE model_type = ?1 AND {} = ?2",
            self.config.status_table, self.config.owner_key_column
        ))
        .bind(&owner.owner_type)
        .bind(owner.owner_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        debug!(owner = %owner, deleted, "statuses cleared");
        Ok(deleted)
    }

    fn row_to_status(row: &SqliteRow) -> Result<Status> {
        let created_str: String = row.try_get("created_at")?;
        let updated_str: String = row.try_get("updated_at")?;
        Ok(Status {
            id: row.try_get("id")?,
            owner_type: row.try_get("model_type")?,
            owner_id: row.try_get("owner_id")?,
            name: row.try_get("name")?,
            value: row.try_get("value")?,
            created_at: parse_timestamp("created_at", &created_str)?,
            updated_at: parse_timestamp("updated_at", &updated_str)?,
        })
    }
}

fn parse_timestamp(column: &str, s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            }
            .into()
        })
}
