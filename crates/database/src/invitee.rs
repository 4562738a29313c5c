//! Invitee bookkeeping: users we have invited to participate.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;

/// Record `username` as having been invited. Idempotent: inviting the same
/// user twice is not an error.
pub async fn insert_invitee(pool: &SqlitePool, username: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO invitees (username)
        VALUES (?)
        ON CONFLICT(username) DO NOTHING
        "#,
    )
    .bind(username)
    .execute(pool)
    .await?;

    debug!("Recorded invitee: {}", username);
    Ok(())
}

/// Check whether `username` has already been invited.
pub async fn is_invitee(pool: &SqlitePool, username: &str) -> Result<bool> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT username FROM invitees WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    Ok(row.is_some())
}
