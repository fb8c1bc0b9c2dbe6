//! Decoded `ContentSubmitted` events from the source chain.

use std::fmt;

use alloy::{
    primitives::{Address, TxHash},
    rpc::types::Log,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ContentSubmission;
use crate::contracts::IContentRegistry::ContentSubmitted;

/// Identity of an on-chain event: a transaction may emit several logs, so
/// the hash alone is not enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    /// Hash of the emitting transaction.
    pub tx_hash: TxHash,
    /// Position of the log within its block.
    pub log_index: u64,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.log_index)
    }
}

/// Errors raised while turning a raw log into a [`ContentEvent`].
#[derive(Debug, Error)]
pub enum EventDecodeError {
    /// The log is pending or otherwise lacks positional metadata.
    #[error("log is missing {0}")]
    MissingField(&'static str),

    /// The log was dropped by a reorg.
    #[error("log was removed by a chain reorganisation")]
    Removed,

    /// The topics or data do not match the `ContentSubmitted` ABI.
    #[error("log does not decode as ContentSubmitted: {0}")]
    Abi(#[from] alloy::sol_types::Error),
}

/// A content submission observed on the source chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEvent {
    /// Unique identity of the log.
    pub key: EventKey,
    /// Block the log was emitted in.
    pub block_number: u64,
    /// Account that submitted the content.
    pub author: Address,
    /// The submitted text.
    pub content: String,
    /// Timestamp emitted by the contract, in unix seconds.
    pub timestamp: u64,
}

impl ContentEvent {
    /// Converts the event into the pipeline's input.
    pub fn to_submission(&self) -> ContentSubmission {
        ContentSubmission::new(self.content.clone(), self.author.to_checksum(None))
    }
}

impl TryFrom<&Log> for ContentEvent {
    type Error = EventDecodeError;

    fn try_from(log: &Log) -> Result<Self, Self::Error> {
        if log.removed {
            return Err(EventDecodeError::Removed);
        }
        let tx_hash = log.transaction_hash.ok_or(EventDecodeError::MissingField("transaction hash"))?;
        let log_index = log.log_index.ok_or(EventDecodeError::MissingField("log index"))?;
        let block_number = log.block_number.ok_or(EventDecodeError::MissingField("block number"))?;

        let decoded = log.log_decode::<ContentSubmitted>()?;
        let ContentSubmitted { author, content, timestamp } = decoded.inner.data;

        Ok(Self {
            key: EventKey { tx_hash, log_index },
            block_number,
            author,
            content,
            timestamp: timestamp.saturating_to::<u64>(),
        })
    }
}
