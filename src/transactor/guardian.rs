//! Signs and submits `flagAddress` transactions to the guardian contract.

use std::{str::FromStr, sync::Arc};

use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::Address,
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use async_trait::async_trait;

use super::{FlagOutcome, Flagger, NonceManager, TransactorError};
use crate::{
    config::TransactorConfig,
    contracts::IGuardian::flagAddressCall,
    providers::{Chain, ChainGateway, ContractHandle, ContractName},
};

/// Gas limit of every flag transaction.
pub const FLAG_GAS_LIMIT: u64 = 100_000;

struct Signer {
    address: Address,
    wallet: EthereumWallet,
}

/// [`Flagger`] that talks to the guardian contract through the gateway.
pub struct GuardianTransactor {
    gateway: Arc<ChainGateway>,
    signer: Option<Signer>,
    nonces: NonceManager,
    gas_price_wei: u128,
}

impl GuardianTransactor {
    /// Creates a transactor. A missing key is allowed here and reported on the
    /// first flag attempt; a malformed key is rejected immediately.
    pub fn new(gateway: Arc<ChainGateway>, config: &TransactorConfig) -> Result<Self, TransactorError> {
        let signer = match config.private_key.as_ref().filter(|key| !key.is_blank()) {
            Some(key) => {
                let local = PrivateKeySigner::from_str(key.expose().trim())
                    .map_err(|e| TransactorError::InvalidSigningKey(e.to_string()))?;
                let address = local.address();
                tracing::info!(signer = %address, "Flagging account loaded.");
                Some(Signer { address, wallet: EthereumWallet::from(local) })
            }
            None => {
                tracing::warn!("No flagging key configured; malicious authors will not be flagged.");
                None
            }
        };

        Ok(Self { gateway, signer, nonces: NonceManager::new(), gas_price_wei: config.gas_price_wei() })
    }

    /// Address of the flagging account, when a key is configured.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|signer| signer.address)
    }

    async fn submit(&self, handle: &ContractHandle, signer: &Signer, target: Address) -> FlagOutcome {
        let provider = handle.provider();
        let call_timeout = handle.connection().call_timeout();

        let reservation = match self.nonces.reserve(signer.address, provider.as_ref(), call_timeout).await {
            Ok(reservation) => reservation,
            Err(error) => {
                tracing::error!(%error, "Could not resolve nonce for flag transaction.");
                return FlagOutcome::Failed(error.to_string());
            }
        };
        let nonce = reservation.nonce();

        let request = TransactionRequest::default()
            .with_from(signer.address)
            .with_to(handle.address())
            .with_input(flagAddressCall { maliciousAddress: target }.abi_encode())
            .with_nonce(nonce)
            .with_chain_id(handle.chain_id())
            .with_gas_limit(FLAG_GAS_LIMIT)
            .with_gas_price(self.gas_price_wei);

        let envelope = match request.build(&signer.wallet).await {
            Ok(envelope) => envelope,
            Err(error) => {
                tracing::error!(%error, nonce, "Could not sign flag transaction.");
                return FlagOutcome::Failed(format!("signing failed: {error}"));
            }
        };
        let raw = envelope.encoded_2718();

        match tokio::time::timeout(call_timeout, provider.send_raw_transaction(&raw)).await {
            Ok(Ok(pending)) => {
                let tx_hash = *pending.tx_hash();
                reservation.commit();
                tracing::info!(%target, %tx_hash, nonce, "Flag transaction submitted.");
                FlagOutcome::Submitted(tx_hash)
            }
            Ok(Err(error)) => {
                reservation.invalidate();
                tracing::error!(%target, %error, nonce, "Flag transaction rejected.");
                FlagOutcome::Failed(error.to_string())
            }
            Err(_) => {
                reservation.invalidate();
                tracing::error!(%target, nonce, timeout = ?call_timeout, "Flag transaction submission timed out.");
                FlagOutcome::Failed(format!("submission timed out after {call_timeout:?}"))
            }
        }
    }
}

#[async_trait]
impl Flagger for GuardianTransactor {
    #[tracing::instrument(skip(self), level = "info")]
    async fn flag(&self, target: Address) -> Result<FlagOutcome, TransactorError> {
        if !self.gateway.is_connected(Chain::Destination) {
            tracing::warn!("Destination chain not connected; skipping flag.");
            return Ok(FlagOutcome::Unavailable("destination chain not connected".into()));
        }
        let Some(handle) = self.gateway.contract(Chain::Destination, ContractName::Guardian) else {
            tracing::warn!("Guardian contract unavailable; skipping flag.");
            return Ok(FlagOutcome::Unavailable("guardian contract unavailable".into()));
        };
        let signer = self.signer.as_ref().ok_or(TransactorError::MissingSigningKey)?;

        Ok(self.submit(handle, signer, target).await)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use alloy::{
        consensus::{Transaction, TxEnvelope},
        eips::eip2718::Decodable2718,
        primitives::{Bytes, U64, address, b256, keccak256},
        transports::{http::reqwest::Url, mock::Asserter},
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        config::{RpcRetryConfig, SecretString},
        models::SENTINEL_TX_HASH,
        providers::{ChainConnection, create_provider},
        test_helpers::{TEST_SIGNER_KEY, mock_connection, unreachable_connection},
    };

    const GUARDIAN: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
    const AUTHOR: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn config(key: Option<&str>) -> TransactorConfig {
        TransactorConfig { private_key: key.map(SecretString::new), ..Default::default() }
    }

    fn live_transactor(key: Option<&str>) -> (GuardianTransactor, Asserter) {
        let (destination, asserter) = mock_connection(Chain::Destination, 43113);
        let gateway = ChainGateway::from_parts(None, Some(destination), None, Some(GUARDIAN));
        (GuardianTransactor::new(Arc::new(gateway), &config(key)).unwrap(), asserter)
    }

    #[test]
    fn test_signer_address_derived_from_key() {
        let transactor =
            GuardianTransactor::new(Arc::new(ChainGateway::offline()), &config(Some(TEST_SIGNER_KEY)))
                .unwrap();
        assert_eq!(
            transactor.signer_address(),
            Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
        );
    }

    #[test]
    fn test_malformed_key_is_rejected() {
        let result = GuardianTransactor::new(Arc::new(ChainGateway::offline()), &config(Some("0x1234")));
        assert!(matches!(result, Err(TransactorError::InvalidSigningKey(_))));
    }

    #[tokio::test]
    async fn test_offline_gateway_yields_sentinel() {
        let transactor =
            GuardianTransactor::new(Arc::new(ChainGateway::offline()), &config(Some(TEST_SIGNER_KEY)))
                .unwrap();
        let outcome = transactor.flag(AUTHOR).await.unwrap();
        assert!(matches!(outcome, FlagOutcome::Unavailable(_)));
        assert_eq!(outcome.tx_hash(), SENTINEL_TX_HASH);
    }

    #[tokio::test]
    async fn test_dead_destination_yields_sentinel() {
        let gateway = ChainGateway::from_parts(
            None,
            Some(unreachable_connection(Chain::Destination)),
            None,
            Some(GUARDIAN),
        );
        let transactor = GuardianTransactor::new(Arc::new(gateway), &config(Some(TEST_SIGNER_KEY))).unwrap();
        assert_eq!(transactor.flag(AUTHOR).await.unwrap().tx_hash(), SENTINEL_TX_HASH);
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let (transactor, _asserter) = live_transactor(None);
        let result = transactor.flag(AUTHOR).await;
        assert!(matches!(result, Err(TransactorError::MissingSigningKey)));
    }

    #[tokio::test]
    async fn test_flag_submits_signed_transaction() {
        let (transactor, asserter) = live_transactor(Some(TEST_SIGNER_KEY));
        let tx_hash = b256!("0x8e3a6c4bdf1c2c7f0b5a8a1f6cbb3b7d45e2f5f9a2c0f1e6d7b8a9c0d1e2f3a4");
        asserter.push_success(&U64::from(7));
        asserter.push_success(&tx_hash);

        let outcome = transactor.flag(AUTHOR).await.unwrap();
        assert_eq!(outcome, FlagOutcome::Submitted(tx_hash));
    }

    #[tokio::test]
    async fn test_rejected_submission_fails_and_resyncs_nonce() {
        let (transactor, asserter) = live_transactor(Some(TEST_SIGNER_KEY));
        let tx_hash = b256!("0x0202020202020202020202020202020202020202020202020202020202020202");
        asserter.push_success(&U64::from(7));
        asserter.push_failure_msg("nonce too low");
        asserter.push_success(&U64::from(9));
        asserter.push_success(&tx_hash);

        let failed = transactor.flag(AUTHOR).await.unwrap();
        assert!(matches!(&failed, FlagOutcome::Failed(reason) if reason.contains("nonce too low")));
        assert_eq!(failed.tx_hash(), SENTINEL_TX_HASH);

        let retried = transactor.flag(AUTHOR).await.unwrap();
        assert_eq!(retried, FlagOutcome::Submitted(tx_hash));
    }

    #[tokio::test]
    async fn test_concurrent_flags_are_serialized_per_signer() {
        let (transactor, asserter) = live_transactor(Some(TEST_SIGNER_KEY));
        let first = b256!("0x0303030303030303030303030303030303030303030303030303030303030303");
        let second = b256!("0x0404040404040404040404040404040404040404040404040404040404040404");
        // A second nonce read would consume a hash response and fail to decode.
        asserter.push_success(&U64::from(7));
        asserter.push_success(&first);
        asserter.push_success(&second);

        let (a, b) = tokio::join!(transactor.flag(AUTHOR), transactor.flag(GUARDIAN));
        let mut hashes = vec![a.unwrap(), b.unwrap()];
        assert!(hashes.iter().all(FlagOutcome::is_submitted));
        hashes.sort_by_key(FlagOutcome::tx_hash);
        assert_eq!(hashes, vec![FlagOutcome::Submitted(first), FlagOutcome::Submitted(second)]);
    }

    /// Answers `eth_getTransactionCount` with 7 and records every raw
    /// transaction passed to `eth_sendRawTransaction`.
    fn rpc_reply(request: &mockito::Request, sent: &Mutex<Vec<Bytes>>) -> Vec<u8> {
        let call: Value = request
            .body()
            .ok()
            .and_then(|body| serde_json::from_slice(body).ok())
            .unwrap_or(Value::Null);
        let result = match call["method"].as_str() {
            Some("eth_getTransactionCount") => json!("0x7"),
            Some("eth_sendRawTransaction") => {
                let raw: Bytes = serde_json::from_value(call["params"][0].clone()).unwrap_or_default();
                let hash = keccak256(&raw);
                sent.lock().unwrap().push(raw);
                json!(hash)
            }
            _ => {
                return json!({ "jsonrpc": "2.0", "id": call["id"], "error": { "code": -32601, "message": "unexpected method" } })
                    .to_string()
                    .into_bytes();
            }
        };
        json!({ "jsonrpc": "2.0", "id": call["id"], "result": result }).to_string().into_bytes()
    }

    #[tokio::test]
    async fn test_concurrent_flags_are_signed_with_consecutive_nonces() {
        let mut server = mockito::Server::new_async().await;
        let sent = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&sent);
        let rpc = server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body_from_request(move |request| rpc_reply(request, &recorder))
            .expect(3)
            .create_async()
            .await;

        let url = Url::parse(&server.url()).unwrap();
        let retry = RpcRetryConfig { max_retry: 0, ..Default::default() };
        let provider = create_provider(vec![url.clone()], &retry).unwrap();
        let destination =
            ChainConnection::new(Chain::Destination, url, provider, Some(43113), Duration::from_secs(5));
        let gateway = ChainGateway::from_parts(None, Some(destination), None, Some(GUARDIAN));
        let transactor = GuardianTransactor::new(Arc::new(gateway), &config(Some(TEST_SIGNER_KEY))).unwrap();

        let (a, b) = tokio::join!(transactor.flag(AUTHOR), transactor.flag(GUARDIAN));
        assert!(a.unwrap().is_submitted());
        assert!(b.unwrap().is_submitted());
        rpc.assert_async().await;

        let transactions: Vec<TxEnvelope> = sent
            .lock()
            .unwrap()
            .iter()
            .map(|raw| TxEnvelope::decode_2718(&mut &raw[..]).unwrap())
            .collect();
        let nonces: Vec<u64> = transactions.iter().map(|tx| tx.nonce()).collect();
        assert_eq!(nonces, vec![7, 8]);
        for tx in &transactions {
            assert_eq!(tx.chain_id(), Some(43113));
            assert_eq!(tx.gas_limit(), FLAG_GAS_LIMIT);
            assert_eq!(tx.to(), Some(GUARDIAN));
        }
    }
}
