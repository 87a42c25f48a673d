//! SQLite implementation of `DraftStore`.
//!
//! Persists one row per user in the `drafts` table. The draft itself is
//! stored as JSON in `data`; the step is a separate column so listings and
//! resumption do not depend on the JSON shape. Saves upsert on `user_id`
//! and keep the row's original `created_at`.

use std::str::FromStr;

use catchpost_core::storage::draft_store::DraftStore;
use catchpost_types::draft::{Draft, DraftRecord, DraftSummary};
use catchpost_types::error::RepositoryError;
use catchpost_types::ids::UserId;
use catchpost_types::step::Step;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::sqlite::pool::DatabasePool;

/// SQLite-backed draft persistence.
pub struct SqliteDraftStore {
    pool: DatabasePool,
}

impl SqliteDraftStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Query(e.to_string()))
}

fn parse_step(s: &str) -> Result<Step, RepositoryError> {
    Step::from_str(s).map_err(|e| RepositoryError::Query(format!("invalid step: {e}")))
}

fn parse_draft(json: &str) -> Result<Draft, RepositoryError> {
    serde_json::from_str(json).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// DraftStore implementation
// ---------------------------------------------------------------------------

impl DraftStore for SqliteDraftStore {
    async fn save(&self, record: &DraftRecord) -> Result<(), RepositoryError> {
        let data = serde_json::to_string(&record.draft)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO drafts (user_id, step, data, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                   step = excluded.step,
                   data = excluded.data,
                   updated_at = excluded.updated_at"#,
        )
        .bind(record.user_id.0)
        .bind(record.step.as_str())
        .bind(&data)
        .bind(format_datetime(&record.created_at))
        .bind(format_datetime(&record.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, user_id: UserId) -> Result<Option<DraftRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, step, data, created_at, updated_at FROM drafts WHERE user_id = ?",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let step: String = get(&row, "step")?;
        let data: String = get(&row, "data")?;
        let created_at: String = get(&row, "created_at")?;
        let updated_at: String = get(&row, "updated_at")?;

        Ok(Some(DraftRecord {
            user_id: UserId(get(&row, "user_id")?),
            step: parse_step(&step)?,
            draft: parse_draft(&data)?,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        }))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM drafts WHERE user_id = ?")
            .bind(user_id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<DraftSummary>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT user_id, step, data, updated_at FROM drafts ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let step: String = get(row, "step")?;
            let data: String = get(row, "data")?;
            let updated_at: String = get(row, "updated_at")?;
            let draft = parse_draft(&data)?;

            summaries.push(DraftSummary {
                user_id: UserId(get(row, "user_id")?),
                step: parse_step(&step)?,
                author: draft.author,
                photo_count: draft.photos.len(),
                updated_at: parse_datetime(&updated_at)?,
            });
        }

        Ok(summaries)
    }
}
