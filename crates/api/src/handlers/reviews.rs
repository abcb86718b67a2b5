//! Handlers for the `/reviews` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gigbook_core::review::{reviewee_for, validate_ratings, validate_review_text, RatingSummary};
use gigbook_core::types::DbId;
use gigbook_db::models::review::{CreateReview, ReviewRequest};
use gigbook_db::repositories::{ArtistRepo, ReviewRepo};
use gigbook_events::{catalog, PlatformEvent};

use crate::engine::booking_flow;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/reviews/bookings/{id}
///
/// Rate the other party of a completed booking. One review per reviewer
/// per booking; a second attempt is a 409 from `uq_reviews_booking_reviewer`.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    validate_ratings(
        input.rating,
        &[
            ("professionalism", input.professionalism),
            ("communication", input.communication),
            ("punctuality", input.punctuality),
            ("quality", input.quality),
        ],
    )?;
    validate_review_text(input.review_text.as_deref())?;

    let detail = booking_flow::load_visible(&state, booking_id, &auth).await?;
    let reviewee_id = reviewee_for(
        detail.booking.state()?.status,
        auth.user_id,
        detail.artist_user_id,
        detail.organizer_user_id,
    )?;

    let create = CreateReview {
        booking_id,
        reviewer_id: auth.user_id,
        reviewee_id,
        rating: input.rating,
        professionalism: input.professionalism,
        communication: input.communication,
        punctuality: input.punctuality,
        quality: input.quality,
        review_text: input.review_text,
        would_recommend: input.would_recommend.unwrap_or(true),
    };
    let review = ReviewRepo::create(&state.pool, &create).await?;

    tracing::info!(
        review_id = review.id,
        booking_id,
        reviewer_id = auth.user_id,
        reviewee_id,
        rating = review.rating,
        "Review created"
    );
    state.publish(
        PlatformEvent::new(catalog::REVIEW_CREATED)
            .with_source(catalog::ENTITY_REVIEW, review.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "booking_id": booking_id,
                "reviewee_id": reviewee_id,
                "rating": review.rating,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/reviews/users/{user_id}
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let reviews = ReviewRepo::list_for_reviewee(&state.pool, user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/reviews/artists/{artist_id}/summary
pub async fn artist_summary(
    State(state): State<AppState>,
    Path(artist_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let artist = ArtistRepo::find_by_id(&state.pool, artist_id)
        .await?
        .ok_or_else(|| AppError::not_found("Artist", artist_id))?;
    let ratings = ReviewRepo::ratings_for_user(&state.pool, artist.user_id).await?;
    Ok(Json(DataResponse {
        data: RatingSummary::from_ratings(&ratings),
    }))
}
