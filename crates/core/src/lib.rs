//! GigBook domain core.
//!
//! Pure business rules with no I/O: status machines for events,
//! applications, bookings and disputes, fee arithmetic, and input
//! validation shared by the repository and HTTP layers.

pub mod application;
pub mod booking;
pub mod dispute;
pub mod error;
pub mod event;
pub mod paging;
pub mod review;
pub mod roles;
pub mod types;
