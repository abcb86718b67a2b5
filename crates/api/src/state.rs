use std::sync::Arc;

use gigbook_events::{EventBus, PlatformEvent};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and everything else is
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: gigbook_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Activity bus; every committed state change is announced here.
    pub event_bus: Arc<EventBus>,
}

impl AppState {
    pub fn publish(&self, event: PlatformEvent) {
        self.event_bus.publish(event);
    }
}
