use std::{sync::Arc, time::Duration};

use alloy::{
    providers::{Provider, ProviderBuilder},
    transports::{http::reqwest::Url, mock::Asserter},
};

use crate::providers::{Chain, ChainConnection, SharedProvider};

/// Anvil's first development key. Never holds real funds.
pub const TEST_SIGNER_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Creates a mock provider and an asserter for testing purposes.
pub fn mock_provider() -> (SharedProvider, Asserter) {
    let asserter = Asserter::new();
    let provider: Arc<dyn Provider + Send + Sync> =
        Arc::new(ProviderBuilder::new().connect_mocked_client(asserter.clone()));
    (provider, asserter)
}

fn mock_endpoint(chain: Chain) -> Url {
    Url::parse(&format!("http://{chain}.mock.invalid")).expect("static URL")
}

/// A live connection for `chain` backed by a mocked transport.
pub fn mock_connection(chain: Chain, chain_id: u64) -> (ChainConnection, Asserter) {
    let (provider, asserter) = mock_provider();
    let connection =
        ChainConnection::new(chain, mock_endpoint(chain), provider, Some(chain_id), Duration::from_secs(2));
    (connection, asserter)
}

/// A connection whose startup connectivity check failed.
pub fn unreachable_connection(chain: Chain) -> ChainConnection {
    let (provider, _) = mock_provider();
    ChainConnection::new(chain, mock_endpoint(chain), provider, None, Duration::from_secs(2))
}
