//! Single-row store for the processed-event high-water mark.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;

/// Load the stored high-water mark.
///
/// Returns `None` when nothing has been recorded yet (first run); callers
/// treat that as a zero mark.
pub async fn load(pool: &SqlitePool) -> Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT event_id FROM seen_event WHERE id = 0")
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(event_id,)| event_id))
}

/// Record `event_id` as the new high-water mark.
pub async fn store(pool: &SqlitePool, event_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO seen_event (id, event_id)
        VALUES (0, ?)
        ON CONFLICT(id) DO UPDATE SET event_id = excluded.event_id
        "#,
    )
    .bind(event_id)
    .execute(pool)
    .await?;

    debug!("Recorded event {} as having been seen", event_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn empty_store_loads_none() {
        let db = test_db().await;
        assert_eq!(super::load(db.pool()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn store_then_load_round_trips() {
        let db = test_db().await;
        super::store(db.pool(), 42).await.unwrap();
        assert_eq!(super::load(db.pool()).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn store_overwrites_single_row() {
        let db = test_db().await;
        super::store(db.pool(), 1).await.unwrap();
        super::store(db.pool(), 2).await.unwrap();
        super::store(db.pool(), 3).await.unwrap();
        assert_eq!(super::load(db.pool()).await.unwrap(), Some(3));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_event")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
