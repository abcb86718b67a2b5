//! GigBook activity bus.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the envelope every state change is announced in.
//! - [`EventPersistence`] -- background service that appends every event to
//!   the `activity_log` table.
//! - [`catalog`] -- the event type and entity type names in use.

pub mod bus;
pub mod catalog;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
