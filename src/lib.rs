//! Sign Protocol attestation workflow library.

pub mod attestation;
pub mod config;
pub mod identity;
pub mod indexing;
pub mod observability;
pub mod resilience;
pub mod workflow;

pub use attestation::{AttestationProtocol, SignProtocolClient};
pub use config::AppConfig;
pub use identity::Identity;
pub use indexing::{IndexingClient, QueryResult};
pub use workflow::{Workflow, WorkflowPlan};
