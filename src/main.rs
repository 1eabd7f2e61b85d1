//! Sign Protocol attestation workflow (v1)
//!
//! Registers a schema, submits one notary attestation against it and
//! confirms the attestation is queryable through the indexing service.
//!
//! # Flow
//!
//! ```text
//!   ATTEST_PRIVATE_KEY ──▶ identity ──┐
//!                                     ▼
//!   ┌──────────────┐   settle   ┌──────────────┐   settle   ┌──────────────┐
//!   │ create schema│──────────▶ │  attest      │──────────▶ │ query index  │──▶ stdout
//!   │  (on-chain)  │            │  (on-chain)  │            │  (HTTP GET)  │
//!   └──────────────┘            └──────────────┘            └──────────────┘
//! ```
//!
//! # Exit Codes
//! - 0: attestation confirmed through the index
//! - 1: workflow halted (identity, schema, attestation or settle failure)
//! - 2: invalid configuration
//! - 3: workflow completed but the query did not succeed

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use attestation_workflow::attestation::{SchemaDefinition, SignProtocolClient};
use attestation_workflow::config::resolve_config;
use attestation_workflow::identity::Identity;
use attestation_workflow::indexing::IndexingClient;
use attestation_workflow::observability::init_logging;
use attestation_workflow::workflow::{
    exit_status, SettlePolicy, SetupError, Workflow, WorkflowPlan,
};

#[derive(Parser)]
#[command(name = "attestation-workflow")]
#[command(
    about = "Register a schema, attest against it and confirm through the indexing service",
    long_about = None
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only wait the fixed settle delay between steps; skip confirmation polling.
    #[arg(long)]
    fixed_delay: bool,

    /// Contract details to attest (overrides the config file).
    #[arg(long)]
    contract_details: Option<String>,
}

fn abort(err: SetupError) -> ExitCode {
    eprintln!("{}", err);
    ExitCode::from(err.exit_status())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return abort(e.into()),
    };
    if cli.fixed_delay {
        config.settle.poll = false;
    }
    if let Some(details) = cli.contract_details {
        config.attestation.contract_details = details;
    }

    init_logging(&config.observability);
    tracing::info!("attestation-workflow v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        chain_id = config.chain.chain_id,
        rpc_url = %config.chain.rpc_url,
        indexing_url = %config.indexing.base_url,
        settle_delay_ms = config.settle.delay_ms,
        poll = config.settle.poll,
        "Configuration loaded"
    );

    let identity = match Identity::from_env(&config.identity.private_key_env) {
        Ok(identity) => identity,
        Err(e) => return abort(e.into()),
    };
    let protocol = match SignProtocolClient::new(&config.chain, &identity) {
        Ok(client) => client,
        Err(e) => return abort(e.into()),
    };
    let index = match IndexingClient::new(&config.indexing) {
        Ok(client) => client,
        Err(e) => return abort(e.into()),
    };

    let plan = WorkflowPlan::notary(
        SchemaDefinition::from(&config.schema),
        &config.attestation.contract_details,
        identity.address(),
    );
    let workflow = Workflow::new(protocol, index, SettlePolicy::from(&config.settle));

    let result = workflow.run(&plan).await;
    match &result {
        Ok(report) => {
            println!("Schema created: {}", report.schema_id);
            println!("Attestation created: {}", report.attestation.attestation_id);
            match serde_json::to_string_pretty(&report.query) {
                Ok(json) => println!("Query result: {}", json),
                Err(e) => eprintln!("Failed to render query result: {}", e),
            }
        }
        Err(e) => {
            tracing::error!(stage = %e.stage(), "Workflow halted");
            eprintln!("{}", e);
        }
    }

    ExitCode::from(exit_status(&result))
}
