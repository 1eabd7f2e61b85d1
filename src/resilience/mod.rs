//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Chain call:
//!     → timeouts.rs (enforce per-call deadline)
//! Settle between steps:
//!     → backoff.rs (spacing between confirmation probes)
//! ```
//!
//! # Design Decisions
//! - Write calls (schema, attestation) are never retried
//! - Only read-side confirmation probes are repeated, with jittered backoff

pub mod backoff;
pub mod timeouts;

pub use backoff::calculate_backoff;
pub use timeouts::with_timeout;
