//! The dual-chain gateway: one connection per chain and the contract handle
//! bound on each.
//!
//! Absence is a first-class state here. A connection that could not be
//! created, a chain that did not answer the startup connectivity check, and a contract
//! whose address is not configured all surface as `false` / `None` rather
//! than as errors. Nothing reconnects after startup.

use std::{fmt, time::Duration};

use alloy::{primitives::Address, sol_types::SolCall, sol_types::SolEvent, transports::http::reqwest::Url};

use super::rpc::{SharedProvider, create_provider};
use crate::{
    config::{ChainEndpointConfig, ChainsConfig, RpcRetryConfig},
    contracts::{IContentRegistry::ContentSubmitted, IGuardian::flagAddressCall},
};

/// One of the two chains the oracle is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    /// Where content submissions originate.
    Source,
    /// Where the guardian contract lives.
    Destination,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Source => f.write_str("source"),
            Chain::Destination => f.write_str("destination"),
        }
    }
}

/// The contracts the gateway knows how to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractName {
    /// Content registry emitting `ContentSubmitted`.
    Content,
    /// Guardian exposing `flagAddress`.
    Guardian,
}

impl ContractName {
    /// The chain this contract is deployed on.
    pub fn chain(self) -> Chain {
        match self {
            ContractName::Content => Chain::Source,
            ContractName::Guardian => Chain::Destination,
        }
    }

    /// The event or function signature the oracle uses on this contract.
    pub fn interface(self) -> &'static str {
        match self {
            ContractName::Content => ContentSubmitted::SIGNATURE,
            ContractName::Guardian => flagAddressCall::SIGNATURE,
        }
    }
}

/// A provider for one chain plus the result of the startup connectivity check.
#[derive(Clone)]
pub struct ChainConnection {
    chain: Chain,
    endpoint: Url,
    provider: SharedProvider,
    chain_id: Option<u64>,
    call_timeout: Duration,
}

impl ChainConnection {
    /// Wraps an already-built provider. `chain_id` is `None` when the chain
    /// did not answer.
    pub fn new(
        chain: Chain,
        endpoint: Url,
        provider: SharedProvider,
        chain_id: Option<u64>,
        call_timeout: Duration,
    ) -> Self {
        Self { chain, endpoint, provider, chain_id, call_timeout }
    }

    /// Builds a provider for `config` and checks it with `eth_chainId`.
    ///
    /// Returns `None` only when no provider could be built at all.
    #[tracing::instrument(skip(config, retry), level = "debug")]
    pub async fn establish(
        chain: Chain,
        config: &ChainEndpointConfig,
        retry: &RpcRetryConfig,
    ) -> Option<Self> {
        let endpoint = config.rpc_urls.first()?.clone();
        let provider = match create_provider(config.rpc_urls.clone(), retry) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::error!(%chain, error = %e, "Could not create chain provider.");
                return None;
            }
        };

        let chain_id = match tokio::time::timeout(retry.request_timeout, provider.get_chain_id()).await {
            Ok(Ok(id)) => Some(id),
            Ok(Err(e)) => {
                tracing::warn!(%chain, %endpoint, error = %e, "Chain did not answer the connectivity check.");
                None
            }
            Err(_) => {
                tracing::warn!(%chain, %endpoint, timeout = ?retry.request_timeout, "Chain connectivity check timed out.");
                None
            }
        };
        tracing::info!(%chain, %endpoint, live = chain_id.is_some(), "Chain connection established.");

        Some(Self::new(chain, endpoint, provider, chain_id, retry.request_timeout))
    }

    /// Which side of the bridge this connection serves.
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// The primary RPC URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Whether the chain answered at startup.
    pub fn live(&self) -> bool {
        self.chain_id.is_some()
    }

    /// Chain id reported at startup, `None` if the chain did not answer.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// The underlying RPC provider.
    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Deadline applied to each RPC call.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }
}

impl fmt::Debug for ChainConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConnection")
            .field("chain", &self.chain)
            .field("endpoint", &self.endpoint.as_str())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// A contract bound to a live chain connection.
#[derive(Clone, Debug)]
pub struct ContractHandle {
    name: ContractName,
    address: Address,
    connection: ChainConnection,
}

impl ContractHandle {
    /// Which contract this handle points at.
    pub fn name(&self) -> ContractName {
        self.name
    }

    /// Deployed address of the contract.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Solidity interface the contract implements.
    pub fn interface(&self) -> &'static str {
        self.name.interface()
    }

    /// Connection the contract lives on.
    pub fn connection(&self) -> &ChainConnection {
        &self.connection
    }

    /// Provider of the bound connection.
    pub fn provider(&self) -> &SharedProvider {
        self.connection.provider()
    }

    /// Chain id of the bound connection. Always known for a bound handle.
    pub fn chain_id(&self) -> u64 {
        self.connection.chain_id.unwrap_or_default()
    }
}

/// Read-only access to both chains, shared across the pipeline after
/// startup.
#[derive(Debug, Default, Clone)]
pub struct ChainGateway {
    source: Option<ChainConnection>,
    destination: Option<ChainConnection>,
    content: Option<ContractHandle>,
    guardian: Option<ContractHandle>,
}

impl ChainGateway {
    /// Connects to both chains and binds whatever contracts are configured.
    /// Never fails; unavailable pieces are simply absent.
    pub async fn connect(chains: &ChainsConfig, retry: &RpcRetryConfig) -> Self {
        let (source, destination) = tokio::join!(
            ChainConnection::establish(Chain::Source, &chains.source, retry),
            ChainConnection::establish(Chain::Destination, &chains.destination, retry),
        );
        Self::from_parts(
            source,
            destination,
            chains.source.contract_address,
            chains.destination.contract_address,
        )
    }

    /// Assembles a gateway from existing connections. A handle is bound only
    /// when its address is set and its chain is live.
    pub fn from_parts(
        source: Option<ChainConnection>,
        destination: Option<ChainConnection>,
        content_address: Option<Address>,
        guardian_address: Option<Address>,
    ) -> Self {
        let content = Self::bind(ContractName::Content, source.as_ref(), content_address);
        let guardian = Self::bind(ContractName::Guardian, destination.as_ref(), guardian_address);
        Self { source, destination, content, guardian }
    }

    /// A gateway with no connections at all.
    pub fn offline() -> Self {
        Self::default()
    }

    fn bind(
        name: ContractName,
        connection: Option<&ChainConnection>,
        address: Option<Address>,
    ) -> Option<ContractHandle> {
        let Some(address) = address else {
            tracing::warn!(contract = ?name, "Contract address not configured; handle unavailable.");
            return None;
        };
        match connection {
            Some(connection) if connection.live() => {
                tracing::info!(contract = ?name, %address, interface = name.interface(), "Contract handle bound.");
                Some(ContractHandle { name, address, connection: connection.clone() })
            }
            _ => {
                tracing::warn!(contract = ?name, %address, "Chain not connected; contract handle unavailable.");
                None
            }
        }
    }

    /// The connection to `chain`, if one was established.
    pub fn connection(&self, chain: Chain) -> Option<&ChainConnection> {
        match chain {
            Chain::Source => self.source.as_ref(),
            Chain::Destination => self.destination.as_ref(),
        }
    }

    /// Whether `chain` answered the startup connectivity check.
    pub fn is_connected(&self, chain: Chain) -> bool {
        self.connection(chain).is_some_and(ChainConnection::live)
    }

    /// The handle for `name` on `chain`, if bound. Asking for a contract on
    /// the wrong chain yields `None`.
    pub fn contract(&self, chain: Chain, name: ContractName) -> Option<&ContractHandle> {
        if name.chain() != chain {
            return None;
        }
        match name {
            ContractName::Content => self.content.as_ref(),
            ContractName::Guardian => self.guardian.as_ref(),
        }
    }
}
