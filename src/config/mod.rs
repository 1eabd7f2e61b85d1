//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (ATTEST_* variables, .env)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets are never part of the file; only the env variable name is

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{read_config, resolve_config, ConfigError};
pub use schema::{
    AppConfig, AttestationConfig, ChainConfig, IdentityConfig, IndexingConfig, LogFormat,
    ObservabilityConfig, SchemaConfig, SettleConfig,
};
pub use validation::ValidationError;
