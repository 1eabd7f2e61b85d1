//! Identity loading and address derivation.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "ATTEST_PRIVATE_KEY";

/// Errors that can occur while establishing an identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The key is not a valid 32-byte secp256k1 secret.
    #[error("Invalid private key format: {0}")]
    InvalidKeyFormat(String),

    /// The environment variable holding the key is not set.
    #[error("Environment variable {0} not set")]
    MissingKey(String),
}

/// Derive the EVM address for a raw 32-byte private key.
///
/// Pure and deterministic: the same key always yields the same address.
pub fn derive_address(private_key: &[u8]) -> Result<Address, IdentityError> {
    if private_key.len() != 32 {
        return Err(IdentityError::InvalidKeyFormat(format!(
            "expected 32 bytes, got {}",
            private_key.len()
        )));
    }
    let signer = PrivateKeySigner::from_slice(private_key)
        .map_err(|e| IdentityError::InvalidKeyFormat(e.to_string()))?;
    Ok(signer.address())
}

/// The signing identity used for every protocol call in a run.
#[derive(Debug, Clone)]
pub struct Identity {
    signer: PrivateKeySigner,
}

impl Identity {
    /// Create an identity from a hex-encoded private key string.
    ///
    /// Accepts the key with or without a `0x` prefix.
    pub fn from_private_key(private_key_hex: &str) -> Result<Self, IdentityError> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| IdentityError::InvalidKeyFormat(format!("{}", e)))?;

        tracing::info!(address = %signer.address(), "Identity loaded");

        Ok(Self { signer })
    }

    /// Load the identity from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, IdentityError> {
        let private_key =
            std::env::var(var).map_err(|_| IdentityError::MissingKey(var.to_string()))?;
        Self::from_private_key(&private_key)
    }

    /// Wrap an existing signer.
    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    /// The public address derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The underlying signer, for building a signing provider.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}
