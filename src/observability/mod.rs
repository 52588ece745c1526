//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config/ and template/ emit tracing events:
//!     → debug: every skipped or applied key, render sizes
//!     → info: merge summary, file written
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, filtered by RUST_LOG)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the binary's job
//! - Structured fields (layer, key, field) rather than formatted messages

pub mod logging;
