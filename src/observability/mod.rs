//! Observability infrastructure.
//!
//! Provides structured logging through `tracing` for every store operation.

pub mod tracing;
