//! Accounts (`users`) plus the profile row created alongside them.

use gigbook_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, NewProfile, User};
use crate::repositories::SessionRepo;

const COLUMNS: &str = "id, name, email, password_hash, role, is_verified, is_active, \
                        failed_login_count, locked_until, last_login_at, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a bare account. Admins are created this way; artists and
    /// organizers go through [`UserRepo::register`].
    pub async fn create<'e, E>(executor: E, input: &CreateUser) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(executor)
            .await
    }

    /// Insert a user and its artist or organizer profile in one transaction.
    ///
    /// Returns the user and the id of the created profile row.
    pub async fn register(
        pool: &PgPool,
        input: &CreateUser,
        profile: &NewProfile,
    ) -> Result<(User, DbId), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let user = Self::create(&mut *tx, input).await?;

        let profile_id: DbId = match profile {
            NewProfile::Artist {
                stage_name,
                genre,
                city,
                base_rate,
            } => {
                sqlx::query_scalar(
                    "INSERT INTO artists (user_id, stage_name, genre, city, base_rate)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id",
                )
                .bind(user.id)
                .bind(stage_name)
                .bind(genre)
                .bind(city)
                .bind(base_rate)
                .fetch_one(&mut *tx)
                .await?
            }
            NewProfile::Organizer {
                organization_name,
                phone,
            } => {
                sqlx::query_scalar(
                    "INSERT INTO organizers (user_id, organization_name, phone)
                     VALUES ($1, $2, $3)
                     RETURNING id",
                )
                .bind(user.id)
                .bind(organization_name)
                .bind(phone)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok((user, profile_id))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lowercased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users, newest first, optionally restricted to one role.
    pub async fn list(
        pool: &PgPool,
        role: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR role = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Set the verification flag. Returns `None` if the user does not exist.
    pub async fn set_verified(
        pool: &PgPool,
        id: DbId,
        verified: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_verified = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(verified)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate an account and revoke its refresh sessions together.
    ///
    /// Returns the number of sessions revoked, or `None` (writing nothing)
    /// when the account was already inactive or does not exist.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let changed = sqlx::query("UPDATE users SET is_active = false WHERE id = $1 AND is_active")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if changed == 0 {
            return Ok(None);
        }

        let revoked = SessionRepo::revoke_all_for_user(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(Some(revoked))
    }

    /// Count a failed password attempt and return the new total.
    ///
    /// The attempt that reaches `max_attempts` also sets `locked_until`.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_until: Timestamp,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET
                failed_login_count = failed_login_count + 1,
                locked_until = CASE WHEN failed_login_count + 1 >= $2 THEN $3 ELSE locked_until END
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_until)
        .fetch_one(pool)
        .await
    }

    /// Clear the failure counter and lock, and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
