//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` + `Validate` request bodies accepted by the API
//! - Plain insert DTOs assembled by handlers from validated input

pub mod activity;
pub mod application;
pub mod artist;
pub mod booking;
pub mod dispute;
pub mod event;
pub mod organizer;
pub mod review;
pub mod session;
pub mod stats;
pub mod user;
