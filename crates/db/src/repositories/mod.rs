//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must compose with
//! other writes inside a transaction take a generic `PgExecutor` instead.

pub mod activity_repo;
pub mod application_repo;
pub mod artist_repo;
pub mod booking_repo;
pub mod dispute_repo;
pub mod event_repo;
pub mod organizer_repo;
pub mod review_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use application_repo::ApplicationRepo;
pub use artist_repo::ArtistRepo;
pub use booking_repo::BookingRepo;
pub use dispute_repo::DisputeRepo;
pub use event_repo::EventRepo;
pub use organizer_repo::OrganizerRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;

/// Qualify a comma-separated column list with a table alias for joins.
pub(crate) fn qualify(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::qualify;

    #[test]
    fn qualify_prefixes_every_column() {
        assert_eq!(qualify("id, name,\n  email", "u"), "u.id, u.name, u.email");
    }
}
