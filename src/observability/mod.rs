//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (step narration, errors)
//!     → a per-run `workflow` span carrying the run id
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```

pub mod logging;

pub use logging::init_logging;
