//! # telebridge-adapter-http-axum
//!
//! HTTP adapter — the synchronous edge polling clients talk to.
//!
//! ## Responsibilities
//! - Serve the registry snapshot (`GET /devices`, `GET /devices/{id}`)
//! - Accept command dispatches (`POST /devices/{id}/commands` and the bulk
//!   variant) and surface dispatch errors as proper status codes
//! - Map domain errors to HTTP responses ([`error::ApiError`])
//!
//! Server bootstrap (bind address, CORS, TLS) lives in the binary crate;
//! this crate only builds the [`axum::Router`].
//!
//! ## Dependency rule
//! Depends on `telebridge-app` and `telebridge-domain` only.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
