//! Repository for the `reviews` table.

use gigbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, ReviewWithReviewer};
use crate::repositories::qualify;

const COLUMNS: &str = "id, booking_id, reviewer_id, reviewee_id, rating, professionalism, \
                        communication, punctuality, quality, review_text, would_recommend, \
                        created_at, updated_at";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. Reviewing the same booking twice violates
    /// `uq_reviews_booking_reviewer`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (booking_id, reviewer_id, reviewee_id, rating, professionalism,
                                  communication, punctuality, quality, review_text,
                                  would_recommend)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.booking_id)
            .bind(input.reviewer_id)
            .bind(input.reviewee_id)
            .bind(input.rating)
            .bind(input.professionalism)
            .bind(input.communication)
            .bind(input.punctuality)
            .bind(input.quality)
            .bind(&input.review_text)
            .bind(input.would_recommend)
            .fetch_one(pool)
            .await
    }

    /// Reviews received by `user_id`, newest first.
    pub async fn list_for_reviewee(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReviewWithReviewer>, sqlx::Error> {
        let query = format!(
            "SELECT {cols}, u.name AS reviewer_name
             FROM reviews r
             JOIN users u ON u.id = r.reviewer_id
             WHERE r.reviewee_id = $1
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT $2 OFFSET $3",
            cols = qualify(COLUMNS, "r")
        );
        sqlx::query_as::<_, ReviewWithReviewer>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// `(rating, would_recommend)` of every review `user_id` has received.
    pub async fn ratings_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<(i16, bool)>, sqlx::Error> {
        sqlx::query_as::<_, (i16, bool)>(
            "SELECT rating, would_recommend FROM reviews WHERE reviewee_id = $1",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
