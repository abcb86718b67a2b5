//! Refresh-token sessions (`user_sessions`).
//!
//! A session row is created at login and replaced on every refresh. Rows are
//! looked up by the SHA-256 digest of the refresh token, never the token.

use gigbook_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                        user_agent, ip_address, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create<'e, E>(executor: E, input: &CreateSession) -> Result<UserSession, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(input.user_agent.as_deref())
            .bind(input.ip_address.as_deref())
            .fetch_one(executor)
            .await
    }

    /// The session behind `token_hash`, if it is neither revoked nor expired.
    pub async fn find_active(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE refresh_token_hash = $1 AND NOT is_revoked AND expires_at > NOW()"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke `old_session_id` and insert `replacement` atomically.
    ///
    /// `None` means another refresh revoked the old session first.
    pub async fn rotate(
        pool: &PgPool,
        old_session_id: DbId,
        replacement: &CreateSession,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query_scalar::<_, DbId>(
            "UPDATE user_sessions SET is_revoked = true
             WHERE id = $1 AND NOT is_revoked
             RETURNING id",
        )
        .bind(old_session_id)
        .fetch_optional(&mut *tx)
        .await?;
        if claimed.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let session = Self::create(&mut *tx, replacement).await?;
        tx.commit().await?;
        Ok(Some(session))
    }

    /// Revoke all live sessions of a user (logout, deactivation).
    pub async fn revoke_all_for_user<'e, E>(executor: E, user_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE user_sessions SET is_revoked = true WHERE user_id = $1 AND NOT is_revoked")
            .bind(user_id)
            .execute(executor)
            .await
            .map(|done| done.rows_affected())
    }

    /// Purge rows that can no longer be used.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        sqlx::query("DELETE FROM user_sessions WHERE is_revoked OR expires_at <= NOW()")
            .execute(pool)
            .await
            .map(|done| done.rows_affected())
    }
}
