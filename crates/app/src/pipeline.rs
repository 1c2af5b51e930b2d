//! Pipeline tasks — the long-running loops around the registry.
//!
//! Decoded bus events travel over a single bounded channel into one
//! mutation task ([`ingest`]), keeping ordering and backpressure explicit
//! instead of mutating from transport callbacks. Durability runs as a
//! separate debounced task ([`checkpoint`]) so disk IO never sits on the
//! event-processing path.

pub mod checkpoint;
pub mod ingest;
