//! Watermark queries and inserts for the `chats` table.

use std::collections::HashMap;

use chatwatch_core::ClassifiedMessage;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Global watermark: the maximum `published_at` over all stored chats,
/// as unix seconds. `None` when the table is empty.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_published_at(pool: &PgPool) -> Result<Option<i64>, DbError> {
    let mark: Option<DateTime<Utc>> =
        sqlx::query_scalar("SELECT MAX(published_at) FROM chats")
            .fetch_one(pool)
            .await?;

    Ok(mark.map(|m| m.timestamp()))
}

/// Per-source watermarks for the given source ids, as unix seconds.
///
/// Sources with no stored chats are absent from the returned map — that
/// absence is what priority selection treats as first-seen.
///
/// # Errors
///
/// Returns [`DbError::EmptySourceList`] when `source_ids` is empty and
/// [`DbError::Sqlx`] if the query fails.
pub async fn latest_published_at_by_source(
    pool: &PgPool,
    source_ids: &[String],
) -> Result<HashMap<String, i64>, DbError> {
    if source_ids.is_empty() {
        return Err(DbError::EmptySourceList);
    }

    let rows: Vec<(String, DateTime<Utc>)> = sqlx::query_as(
        "SELECT source_id, MAX(published_at) AS published_at \
         FROM chats \
         WHERE source_id = ANY($1) \
         GROUP BY source_id",
    )
    .bind(source_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(source_id, mark)| (source_id, mark.timestamp()))
        .collect())
}

/// Insert classified messages in a single transaction.
///
/// All-or-nothing: a failure rolls back every row, so the next invocation's
/// watermark read never observes a partial batch. Empty input is a no-op.
///
/// # Errors
///
/// Returns [`DbError::InvalidTimestamp`] for out-of-range `published_at`
/// values and [`DbError::Sqlx`] if any insert fails.
pub async fn insert_chats(pool: &PgPool, records: &[ClassifiedMessage]) -> Result<(), DbError> {
    if records.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for record in records {
        let published_at = DateTime::<Utc>::from_timestamp(record.message.published_at, 0)
            .ok_or(DbError::InvalidTimestamp(record.message.published_at))?;

        sqlx::query(
            "INSERT INTO chats (message, source_id, published_at, is_negative) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&record.message.text)
        .bind(&record.message.source_id)
        .bind(published_at)
        .bind(record.is_negative)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chatwatch_core::RawMessage;

    use super::*;

    fn classified(text: &str, source_id: &str, published_at: i64) -> ClassifiedMessage {
        ClassifiedMessage {
            message: RawMessage {
                author_id: "author".to_string(),
                text: text.to_string(),
                published_at,
                source_id: source_id.to_string(),
            },
            is_negative: false,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn global_watermark_is_absent_on_empty_table(pool: PgPool) {
        let mark = latest_published_at(&pool).await.expect("query");
        assert_eq!(mark, None);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn global_watermark_is_max_published_at(pool: PgPool) {
        insert_chats(
            &pool,
            &[
                classified("one", "s1", 1_700_000_000),
                classified("two", "s2", 1_700_000_500),
            ],
        )
        .await
        .expect("insert");

        let mark = latest_published_at(&pool).await.expect("query");
        assert_eq!(mark, Some(1_700_000_500));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn per_source_watermarks_group_by_source(pool: PgPool) {
        insert_chats(
            &pool,
            &[
                classified("a1", "s1", 100),
                classified("a2", "s1", 300),
                classified("b1", "s2", 200),
            ],
        )
        .await
        .expect("insert");

        let marks = latest_published_at_by_source(
            &pool,
            &["s1".to_string(), "s2".to_string(), "s3".to_string()],
        )
        .await
        .expect("query");
        assert_eq!(marks.get("s1"), Some(&300));
        assert_eq!(marks.get("s2"), Some(&200));
        assert!(!marks.contains_key("s3"), "never-ingested source is absent");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn per_source_watermarks_reject_empty_source_list(pool: PgPool) {
        let result = latest_published_at_by_source(&pool, &[]).await;
        assert!(matches!(result, Err(DbError::EmptySourceList)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn insert_is_all_or_nothing(pool: PgPool) {
        insert_chats(&pool, &[classified("dup", "s1", 100)])
            .await
            .expect("seed");

        // Second batch violates the (message, source_id) key on its last row;
        // the earlier row in the same batch must not survive.
        let result = insert_chats(
            &pool,
            &[classified("fresh", "s1", 200), classified("dup", "s1", 300)],
        )
        .await;
        assert!(result.is_err(), "duplicate key should fail the batch");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 1, "failed batch must leave no partial rows");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn empty_insert_is_a_noop(pool: PgPool) {
        insert_chats(&pool, &[]).await.expect("noop");
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 0);
    }
}
