//! # telebridge-app
//!
//! Application layer — the reconciliation engine core and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Own the [`registry::DeviceRegistry`], the single authoritative map of
//!   device id → record, with per-device mutation serialization
//! - Define **port traits** that adapters implement (driven/outbound ports):
//!   - `CommandPublisher` — outbound bus hand-off for device commands
//!   - `SnapshotStore` — durable save/load of the registry snapshot
//! - Run the **pipeline tasks**: a single ingest task applying decoded bus
//!   events to the registry, and a debounced checkpoint task persisting
//!   snapshots without holding registry locks during IO
//! - Provide the use-case services: command dispatch (with optimistic
//!   channel updates) and the read-only query façade
//!
//! ## Dependency rule
//! Depends on `telebridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod pipeline;
pub mod ports;
pub mod registry;
pub mod services;
