//! A builder for creating RPC `Log` instances for testing.

use alloy::{
    primitives::{Address, B256, Bytes, LogData, U256},
    rpc::types::Log,
    sol_types::SolEvent,
};

use crate::contracts::IContentRegistry::ContentSubmitted;

/// A builder for creating `Log` instances for testing.
#[derive(Debug, Clone, Default)]
pub struct LogBuilder {
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
    transaction_hash: Option<B256>,
    block_number: Option<u64>,
    log_index: Option<u64>,
    removed: bool,
}

impl LogBuilder {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the address of the contract that emitted the log.
    pub fn address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Appends a topic.
    pub fn topic(mut self, topic: B256) -> Self {
        self.topics.push(topic);
        self
    }

    /// Sets the raw log data.
    pub fn data(mut self, data: Bytes) -> Self {
        self.data = data;
        self
    }

    /// Fills topics and data with an ABI-encoded `ContentSubmitted` event.
    pub fn content_submitted(mut self, author: Address, content: &str, timestamp: U256) -> Self {
        let event = ContentSubmitted { author, content: content.to_string(), timestamp };
        self.topics = vec![ContentSubmitted::SIGNATURE_HASH, author.into_word()];
        self.data = Bytes::from(event.encode_data());
        self
    }

    /// Sets the emitting transaction hash.
    pub fn transaction_hash(mut self, hash: B256) -> Self {
        self.transaction_hash = Some(hash);
        self
    }

    /// Sets the block number.
    pub fn block_number(mut self, number: u64) -> Self {
        self.block_number = Some(number);
        self
    }

    /// Sets the log index.
    pub fn log_index(mut self, index: u64) -> Self {
        self.log_index = Some(index);
        self
    }

    /// Marks the log as dropped by a reorg.
    pub fn removed(mut self, removed: bool) -> Self {
        self.removed = removed;
        self
    }

    /// Builds the log.
    pub fn build(self) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: self.address,
                data: LogData::new_unchecked(self.topics, self.data),
            },
            block_hash: self.block_number.map(|n| B256::from(U256::from(n))),
            block_number: self.block_number,
            block_timestamp: None,
            transaction_hash: self.transaction_hash,
            transaction_index: self.transaction_hash.map(|_| 0),
            log_index: self.log_index,
            removed: self.removed,
        }
    }
}

/// Starts a `LogBuilder` pre-filled with a `ContentSubmitted` payload.
pub fn content_submitted_log(author: Address, content: &str, timestamp: u64) -> LogBuilder {
    LogBuilder::new().content_submitted(author, content, U256::from(timestamp))
}
