//! Sign Protocol client (on-chain mode).
//!
//! # Responsibilities
//! - Register schemas and submit attestations through the `ISP` contract
//! - Recover server-assigned ids from receipt events
//! - Enforce a deadline on every RPC round-trip
//!
//! Signing, nonce and gas handling are delegated to the alloy provider's
//! fillers; nothing here is retried.

use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::attestation::encoding::{
    encode_payload, encode_schema, format_onchain_id, parse_onchain_id,
};
use crate::attestation::protocol::AttestationProtocol;
use crate::attestation::types::{
    AttestationError, AttestationReceipt, AttestationRequest, AttestationResult, SchemaDefinition,
    SchemaId,
};
use crate::config::ChainConfig;
use crate::identity::Identity;
use crate::resilience::with_timeout;

sol! {
    #[sol(rpc)]
    interface ISP {
        enum DataLocation { ONCHAIN, ARWEAVE, IPFS, CUSTOM }

        struct Schema {
            address registrant;
            bool revocable;
            DataLocation dataLocation;
            uint64 maxValidFor;
            address hook;
            uint64 timestamp;
            string data;
        }

        struct Attestation {
            uint64 schemaId;
            uint64 linkedAttestationId;
            uint64 attestTimestamp;
            uint64 revokeTimestamp;
            address attester;
            uint64 validUntil;
            DataLocation dataLocation;
            bool revoked;
            bytes[] recipients;
            bytes data;
        }

        /// Emitted when a schema is registered.
        event SchemaRegistered(uint64 schemaId);

        /// Emitted when an attestation is made.
        event AttestationMade(uint64 attestationId, string indexingKey);

        function register(Schema memory schema, bytes calldata delegateSignature)
            external
            returns (uint64 schemaId);

        function attest(
            Attestation calldata attestation,
            string calldata indexingKey,
            bytes calldata delegateSignature,
            bytes calldata extraData
        ) external returns (uint64 attestationId);

        function getSchema(uint64 schemaId) external view returns (Schema memory);
    }
}

/// Attestation client backed by the Sign Protocol contract.
pub struct SignProtocolClient {
    contract: ISP::ISPInstance<DynProvider>,
    attester: Address,
    chain_id: u64,
    rpc_timeout: Duration,
    receipt_timeout: Duration,
    /// Schemas registered or fetched during this run, by id.
    schemas: DashMap<SchemaId, SchemaDefinition>,
}

impl SignProtocolClient {
    /// Create a client that signs as `identity`.
    pub fn new(config: &ChainConfig, identity: &Identity) -> AttestationResult<Self> {
        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            AttestationError::Protocol(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let contract_address: Address = config.contract_address.parse().map_err(|e| {
            AttestationError::Protocol(format!(
                "Invalid contract address '{}': {}",
                config.contract_address, e
            ))
        })?;

        let wallet = EthereumWallet::from(identity.signer().clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(rpc_url)
            .erased();

        tracing::info!(
            rpc_url = %config.rpc_url,
            chain_id = config.chain_id,
            contract = %contract_address,
            attester = %identity.address(),
            "Sign Protocol client initialized"
        );

        Ok(Self {
            contract: ISP::new(contract_address, provider),
            attester: identity.address(),
            chain_id: config.chain_id,
            rpc_timeout: Duration::from_secs(config.rpc_timeout_secs),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            schemas: DashMap::new(),
        })
    }

    /// Resolve a schema definition, from this run's cache or from chain.
    async fn lookup_schema(&self, schema_id: &SchemaId) -> AttestationResult<SchemaDefinition> {
        if let Some(schema) = self.schemas.get(schema_id) {
            return Ok(schema.value().clone());
        }

        let onchain_id = parse_onchain_id(schema_id)?;
        let stored = with_timeout(self.rpc_timeout, "getSchema", async {
            self.contract
                .getSchema(onchain_id)
                .call()
                .await
                .map_err(protocol_error)
        })
        .await?;

        let schema: SchemaDefinition = serde_json::from_str(&stored.data).map_err(|e| {
            AttestationError::InvalidSchema(format!("stored schema {} is unreadable: {}", schema_id, e))
        })?;
        self.schemas.insert(schema_id.clone(), schema.clone());
        Ok(schema)
    }

    /// Wait for the receipt and reject reverted transactions.
    async fn confirm(
        &self,
        tx_hash: TxHash,
        pending: alloy::providers::PendingTransactionBuilder<alloy::network::Ethereum>,
    ) -> AttestationResult<TransactionReceipt> {
        let receipt = with_timeout(self.receipt_timeout, "transaction receipt", async {
            pending.get_receipt().await.map_err(protocol_error)
        })
        .await?;

        if !receipt.status() {
            return Err(AttestationError::Reverted(tx_hash.to_string()));
        }

        tracing::debug!(
            tx_hash = %tx_hash,
            block_number = receipt.block_number.unwrap_or_default(),
            "Transaction mined"
        );
        Ok(receipt)
    }

    /// Find the first event of type `E` emitted by the contract.
    fn find_event<E: SolEvent>(&self, receipt: &TransactionReceipt) -> Option<E> {
        let address = *self.contract.address();
        receipt
            .inner
            .logs()
            .iter()
            .filter(|log| log.inner.address == address)
            .find_map(|log| log.log_decode::<E>().ok())
            .map(|decoded| decoded.inner.data)
    }
}

#[async_trait]
impl AttestationProtocol for SignProtocolClient {
    async fn create_schema(&self, schema: &SchemaDefinition) -> AttestationResult<SchemaId> {
        schema.validate()?;

        let onchain = ISP::Schema {
            registrant: self.attester,
            revocable: true,
            dataLocation: ISP::DataLocation::ONCHAIN,
            maxValidFor: 0,
            hook: Address::ZERO,
            timestamp: 0,
            data: encode_schema(schema)?,
        };

        let call = self.contract.register(onchain, Bytes::new());
        let pending = with_timeout(self.rpc_timeout, "register", async {
            call.send().await.map_err(protocol_error)
        })
        .await?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, schema = %schema.name, "Schema registration submitted");

        let receipt = self.confirm(tx_hash, pending).await?;
        let event = self
            .find_event::<ISP::SchemaRegistered>(&receipt)
            .ok_or_else(|| AttestationError::MissingEvent {
                tx_hash: tx_hash.to_string(),
                event: "SchemaRegistered",
            })?;

        let schema_id = SchemaId::new(format_onchain_id(self.chain_id, event.schemaId));
        self.schemas.insert(schema_id.clone(), schema.clone());
        Ok(schema_id)
    }

    async fn create_attestation(
        &self,
        request: &AttestationRequest,
    ) -> AttestationResult<AttestationReceipt> {
        let onchain_schema_id = parse_onchain_id(&request.schema_id)?;
        let schema = self.lookup_schema(&request.schema_id).await?;
        let data = encode_payload(&schema, &request.payload)?;

        let attestation = ISP::Attestation {
            schemaId: onchain_schema_id,
            linkedAttestationId: 0,
            attestTimestamp: 0,
            revokeTimestamp: 0,
            attester: self.attester,
            validUntil: 0,
            dataLocation: ISP::DataLocation::ONCHAIN,
            revoked: false,
            recipients: Vec::new(),
            data,
        };

        let call = self.contract.attest(
            attestation,
            request.indexing_value.clone(),
            Bytes::new(),
            Bytes::new(),
        );
        let pending = with_timeout(self.rpc_timeout, "attest", async {
            call.send().await.map_err(protocol_error)
        })
        .await?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(
            tx_hash = %tx_hash,
            schema_id = %request.schema_id,
            "Attestation submitted"
        );

        let receipt = self.confirm(tx_hash, pending).await?;
        let event = self
            .find_event::<ISP::AttestationMade>(&receipt)
            .ok_or_else(|| AttestationError::MissingEvent {
                tx_hash: tx_hash.to_string(),
                event: "AttestationMade",
            })?;

        Ok(AttestationReceipt {
            attestation_id: format_onchain_id(self.chain_id, event.attestationId),
            schema_id: request.schema_id.clone(),
            indexing_value: event.indexingKey,
            tx_hash: Some(tx_hash.to_string()),
        })
    }

    async fn schema_exists(&self, schema_id: &SchemaId) -> AttestationResult<bool> {
        let onchain_id = parse_onchain_id(schema_id)?;
        let stored = with_timeout(self.rpc_timeout, "getSchema", async {
            self.contract
                .getSchema(onchain_id)
                .call()
                .await
                .map_err(protocol_error)
        })
        .await?;
        Ok(stored.registrant != Address::ZERO)
    }
}

impl std::fmt::Debug for SignProtocolClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignProtocolClient")
            .field("contract", self.contract.address())
            .field("attester", &self.attester)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

fn protocol_error(e: impl std::fmt::Display) -> AttestationError {
    AttestationError::Protocol(e.to_string())
}
