//! Workflow orchestration.
//!
//! # Data Flow
//! ```text
//! WorkflowPlan
//!     → orchestrator.rs: create_schema
//!     → settle.rs: wait (+ poll schema_exists)
//!     → orchestrator.rs: create_attestation
//!     → settle.rs: wait (+ poll query until visible)
//!     → WorkflowReport { schema_id, attestation, query }
//!     → exit.rs: process exit status
//! ```

pub mod exit;
pub mod orchestrator;
pub mod settle;

pub use exit::{exit_status, SetupError};
pub use orchestrator::{Stage, Workflow, WorkflowError, WorkflowPlan, WorkflowReport};
pub use settle::{SettlePolicy, Settled};
