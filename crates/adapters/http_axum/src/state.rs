//! Shared application state for axum handlers.

use std::sync::Arc;

use telebridge_app::ports::CommandPublisher;
use telebridge_app::services::command_dispatcher::CommandDispatcher;
use telebridge_app::services::device_query::DeviceQuery;

/// Application state shared across all axum handlers.
///
/// Generic over the command publisher to avoid dynamic dispatch. `Clone` is
/// implemented manually so the underlying types themselves do not need to
/// be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<P> {
    /// Read-only registry façade.
    pub query: Arc<DeviceQuery>,
    /// Outbound command dispatch service.
    pub dispatcher: Arc<CommandDispatcher<P>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            query: Arc::clone(&self.query),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<P: CommandPublisher + Send + Sync + 'static> AppState<P> {
    /// Create a new application state from service instances.
    pub fn new(query: DeviceQuery, dispatcher: CommandDispatcher<P>) -> Self {
        Self {
            query: Arc::new(query),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when services need to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arcs(query: Arc<DeviceQuery>, dispatcher: Arc<CommandDispatcher<P>>) -> Self {
        Self { query, dispatcher }
    }
}
