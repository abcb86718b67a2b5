pub mod admin;
pub mod applications;
pub mod artists;
pub mod auth;
pub mod bookings;
pub mod disputes;
pub mod events;
pub mod health;
pub mod organizers;
pub mod reviews;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                         register (public)
/// /auth/login                                            login (public)
/// /auth/refresh                                          refresh (public)
/// /auth/logout                                           logout
/// /auth/me                                               current user + profile
///
/// /artists                                               list (public)
/// /artists/me                                            update own profile (artist)
/// /artists/{id}                                          profile + rating (public)
///
/// /organizers/me                                         get, update (organizer)
/// /organizers/stats                                      dashboard counts
/// /organizers/bookings/{id}/payment                      pay into escrow
/// /organizers/bookings/{id}/complete                     complete, release escrow
///
/// /events                                                create (organizer)
/// /events/browse/all                                     public listing
/// /events/mine                                           organizer's events
/// /events/types                                          known event types
/// /events/{id}                                           get, update, delete
/// /events/{id}/publish                                   publish
/// /events/{id}/unpublish                                 back to draft
///
/// /event-applications/mine                               artist's applications
/// /event-applications/{event_id}/apply                   apply (artist)
/// /event-applications/{event_id}/applications            list (event owner)
/// /event-applications/{event_id}/applications/{id}/approve
/// /event-applications/{event_id}/applications/{id}/reject
///
/// /bookings                                              list, create
/// /bookings/{id}                                         get (parties, admin)
/// /bookings/{id}/accept                                  accept (artist)
/// /bookings/{id}/decline                                 decline (artist)
/// /bookings/{id}/cancel                                  cancel (either party)
/// /bookings/{id}/activity                                booking timeline
///
/// /disputes/bookings/{id}/report-non-delivery            open (organizer)
/// /disputes/mine                                         caller's disputes
/// /disputes/{id}                                         get (parties, admin)
/// /disputes/{id}/respond                                 answer (artist)
///
/// /reviews/bookings/{id}                                 rate the other party
/// /reviews/users/{user_id}                               reviews received
/// /reviews/artists/{artist_id}/summary                   rating summary
///
/// /admin/users                                           list (admin only)
/// /admin/users/{id}/verify                               set verified
/// /admin/users/{id}/deactivate                           deactivate
/// /admin/disputes                                        list
/// /admin/disputes/{id}/resolve                           resolve
/// /admin/stats                                           platform totals
/// /admin/activity                                        activity feed
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/artists", artists::router())
        .nest("/organizers", organizers::router())
        .nest("/events", events::router())
        .nest("/event-applications", applications::router())
        .nest("/bookings", bookings::router())
        .nest("/disputes", disputes::router())
        .nest("/reviews", reviews::router())
        .nest("/admin", admin::router())
}
