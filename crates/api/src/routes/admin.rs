//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET  /users                  -> list_users
/// POST /users/{id}/verify      -> verify_user
/// POST /users/{id}/deactivate  -> deactivate_user
/// GET  /disputes               -> list_disputes
/// POST /disputes/{id}/resolve  -> resolve_dispute
/// GET  /stats                  -> platform_stats
/// GET  /activity               -> recent_activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/verify", post(admin::verify_user))
        .route("/users/{id}/deactivate", post(admin::deactivate_user))
        .route("/disputes", get(admin::list_disputes))
        .route("/disputes/{id}/resolve", post(admin::resolve_dispute))
        .route("/stats", get(admin::platform_stats))
        .route("/activity", get(admin::recent_activity))
}
