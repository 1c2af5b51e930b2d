//! JSON API route assembly.

use axum::Router;
use axum::routing::{get, post};

use telebridge_app::ports::CommandPublisher;

use crate::state::AppState;

pub mod devices;

/// Build the device API routes.
pub fn routes<P>() -> Router<AppState<P>>
where
    P: CommandPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/devices", get(devices::list::<P>))
        .route("/devices/commands", post(devices::dispatch_bulk::<P>))
        .route("/devices/{id}", get(devices::get::<P>))
        .route("/devices/{id}/commands", post(devices::dispatch::<P>))
}
