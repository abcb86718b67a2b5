//! Repository for the `organizers` table.

use gigbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::organizer::{Organizer, UpdateOrganizer};

const COLUMNS: &str = "id, user_id, organization_name, phone, website, created_at, updated_at";

pub struct OrganizerRepo;

impl OrganizerRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organizer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizers WHERE id = $1");
        sqlx::query_as::<_, Organizer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Organizer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizers WHERE user_id = $1");
        sqlx::query_as::<_, Organizer>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_by_user_id(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateOrganizer,
    ) -> Result<Option<Organizer>, sqlx::Error> {
        let query = format!(
            "UPDATE organizers SET
                organization_name = COALESCE($2, organization_name),
                phone = COALESCE($3, phone),
                website = COALESCE($4, website)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organizer>(&query)
            .bind(user_id)
            .bind(&input.organization_name)
            .bind(&input.phone)
            .bind(&input.website)
            .fetch_optional(pool)
            .await
    }
}
