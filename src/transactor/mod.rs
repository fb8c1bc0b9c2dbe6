//! Cross-chain flagging of malicious authors on the guardian contract.

mod guardian;
pub mod nonce;

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
pub use guardian::{FLAG_GAS_LIMIT, GuardianTransactor};
#[cfg(test)]
use mockall::automock;
pub use nonce::{NonceError, NonceManager, NonceReservation};
use thiserror::Error;

use crate::models::SENTINEL_TX_HASH;

/// Configuration problems that prevent flagging altogether.
#[derive(Debug, Error)]
pub enum TransactorError {
    /// Flagging was attempted without a signing key.
    #[error("no signing key configured for the flagging account")]
    MissingSigningKey,

    /// The configured key could not be parsed.
    #[error("signing key is not a valid secp256k1 private key: {0}")]
    InvalidSigningKey(String),
}

/// What happened when flagging an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagOutcome {
    /// The transaction was accepted by the destination node.
    Submitted(TxHash),
    /// The destination chain or guardian contract is not available.
    Unavailable(String),
    /// Signing or submission failed.
    Failed(String),
}

impl FlagOutcome {
    /// Hash reported to callers; the sentinel for both degraded variants.
    pub fn tx_hash(&self) -> TxHash {
        match self {
            FlagOutcome::Submitted(hash) => *hash,
            FlagOutcome::Unavailable(_) | FlagOutcome::Failed(_) => SENTINEL_TX_HASH,
        }
    }

    /// Whether the destination node accepted the transaction.
    pub fn is_submitted(&self) -> bool {
        matches!(self, FlagOutcome::Submitted(_))
    }

    /// Short human-readable summary used as the `cross_chain_action` field.
    pub fn describe(&self) -> String {
        match self {
            FlagOutcome::Submitted(_) => "Address flagged on destination chain".to_string(),
            FlagOutcome::Unavailable(reason) => format!("Not flagged: {reason}"),
            FlagOutcome::Failed(reason) => format!("Failed: {reason}"),
        }
    }
}

/// Flags an address on the destination chain.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Flagger: Send + Sync {
    /// Submits `flagAddress(target)`. Degraded outcomes are values; only
    /// configuration problems are errors.
    async fn flag(&self, target: Address) -> Result<FlagOutcome, TransactorError>;
}
