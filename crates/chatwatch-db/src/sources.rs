//! Read queries for the `sources` table.

use chatwatch_core::{Source, SourceStatus};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `sources` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SourceRow {
    pub source_id: String,
    pub status: String,
    pub chat_id: String,
    pub updated_at: DateTime<Utc>,
}

impl From<SourceRow> for Source {
    fn from(row: SourceRow) -> Self {
        Source {
            status: SourceStatus::parse(&row.status),
            source_id: row.source_id,
            chat_id: row.chat_id,
        }
    }
}

/// List sources whose status is in `statuses`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sources_by_status(
    pool: &PgPool,
    statuses: &[SourceStatus],
) -> Result<Vec<SourceRow>, DbError> {
    let status_values: Vec<String> = statuses
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();

    let rows = sqlx::query_as::<_, SourceRow>(
        "SELECT source_id, status, chat_id, updated_at \
         FROM sources \
         WHERE status = ANY($1) \
         ORDER BY source_id",
    )
    .bind(&status_values)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
