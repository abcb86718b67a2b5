//! Handlers for the `/artists` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use gigbook_core::booking::validate_optional_rate;
use gigbook_core::error::CoreError;
use gigbook_core::review::RatingSummary;
use gigbook_core::types::DbId;
use gigbook_db::models::artist::{ArtistFilter, ArtistProfile, UpdateArtist};
use gigbook_db::repositories::{ArtistRepo, ReviewRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireArtist;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ArtistListParams {
    pub genre: Option<String>,
    pub city: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/artists
pub async fn list_artists(
    State(state): State<AppState>,
    Query(params): Query<ArtistListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();
    let filter = ArtistFilter {
        genre: params.genre,
        city: params.city,
    };
    let artists = ArtistRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: artists }))
}

/// GET /api/artists/{id}
///
/// Public profile with the artist's rating summary.
pub async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let artist = ArtistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Artist", id))?;

    let user = UserRepo::find_by_id(&state.pool, artist.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::not_found("Artist", id))?;

    let ratings = ReviewRepo::ratings_for_user(&state.pool, artist.user_id).await?;

    Ok(Json(DataResponse {
        data: ArtistProfile {
            artist,
            is_verified: user.is_verified,
            rating: RatingSummary::from_ratings(&ratings),
        },
    }))
}

/// PUT /api/artists/me
pub async fn update_my_profile(
    RequireArtist(auth): RequireArtist,
    State(state): State<AppState>,
    Json(input): Json<UpdateArtist>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_optional_rate("base_rate", input.base_rate)?;

    let artist = ArtistRepo::update_by_user_id(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No artist profile exists for this account".into(),
            ))
        })?;

    tracing::info!(user_id = auth.user_id, artist_id = artist.id, "Artist profile updated");
    Ok(Json(DataResponse { data: artist }))
}
