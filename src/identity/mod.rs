//! Identity provider.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key)
//!     → wallet.rs (key parsing, address derivation)
//!     → Identity (signer + address, lives for the whole run)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys

pub mod wallet;

pub use wallet::{derive_address, Identity, IdentityError, PRIVATE_KEY_ENV_VAR};
