//! Repository for the `artists` table.

use gigbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::artist::{Artist, ArtistFilter, UpdateArtist};
use crate::repositories::qualify;

const COLUMNS: &str =
    "id, user_id, stage_name, genre, bio, base_rate, city, created_at, updated_at";

pub struct ArtistRepo;

impl ArtistRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE id = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE user_id = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Directory listing of artists with active accounts.
    ///
    /// Genre and city match case-insensitively.
    pub async fn list(
        pool: &PgPool,
        filter: &ArtistFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Artist>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM artists a
             JOIN users u ON u.id = a.user_id
             WHERE u.is_active = true
               AND ($1::TEXT IS NULL OR LOWER(a.genre) = LOWER($1))
               AND ($2::TEXT IS NULL OR LOWER(a.city) = LOWER($2))
             ORDER BY a.stage_name, a.id
             LIMIT $3 OFFSET $4",
            cols = qualify(COLUMNS, "a")
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(&filter.genre)
            .bind(&filter.city)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update the profile owned by `user_id`. Only non-`None` fields are applied.
    pub async fn update_by_user_id(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateArtist,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET
                stage_name = COALESCE($2, stage_name),
                genre = COALESCE($3, genre),
                bio = COALESCE($4, bio),
                base_rate = COALESCE($5, base_rate),
                city = COALESCE($6, city)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(user_id)
            .bind(&input.stage_name)
            .bind(&input.genre)
            .bind(&input.bio)
            .bind(input.base_rate)
            .bind(&input.city)
            .fetch_optional(pool)
            .await
    }
}
