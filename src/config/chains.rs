use alloy::primitives::Address;
use serde::Deserialize;
use url::Url;

use super::{deserialize_optional_address, deserialize_urls};

/// Connection settings for one chain plus the single contract the oracle
/// talks to on it.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChainEndpointConfig {
    /// JSON-RPC endpoints; more than one enables transport fallback.
    #[serde(deserialize_with = "deserialize_urls")]
    pub rpc_urls: Vec<Url>,

    /// Address of the contract bound on this chain. Unset means the handle
    /// is absent.
    #[serde(default, deserialize_with = "deserialize_optional_address")]
    pub contract_address: Option<Address>,
}

impl ChainEndpointConfig {
    fn local(port: u16) -> Self {
        let url = Url::parse(&format!("http://127.0.0.1:{port}")).expect("static URL is valid");
        Self { rpc_urls: vec![url], contract_address: None }
    }
}

/// The two chains the oracle bridges: content originates on `source`, the
/// guardian contract lives on `destination`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChainsConfig {
    /// Chain hosting the content registry.
    #[serde(default = "default_source")]
    pub source: ChainEndpointConfig,
    /// Chain hosting the guardian contract.
    #[serde(default = "default_destination")]
    pub destination: ChainEndpointConfig,
}

fn default_source() -> ChainEndpointConfig {
    ChainEndpointConfig::local(8545)
}

fn default_destination() -> ChainEndpointConfig {
    ChainEndpointConfig::local(8546)
}

impl Default for ChainsConfig {
    fn default() -> Self {
        Self { source: default_source(), destination: default_destination() }
    }
}
