//! # telebridge-domain
//!
//! Pure domain model for the telebridge device gateway.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Device records** (the reconciled view of a networked device)
//! - Define **Telemetry** (sensor snapshots and the bounded history ring)
//! - Define **Commands** (outbound actions: `toggleChannel`, `set_interval`, …)
//! - Define **Events** (decoded bus messages flowing through the pipeline)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod command;
pub mod device;
pub mod event;
pub mod telemetry;
