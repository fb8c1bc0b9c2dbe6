use alloy::primitives::TxHash;

use crate::models::{Alert, Label, SENTINEL_TX_HASH};

/// A builder for creating `Alert` instances for testing.
#[derive(Debug, Clone)]
pub struct AlertBuilder {
    alert: Alert,
}

impl Default for AlertBuilder {
    fn default() -> Self {
        Self {
            alert: Alert {
                timestamp: 1_700_000_000,
                content: "Click here to claim now".to_string(),
                author_address: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
                classification: Label::Malicious,
                tx_hash: SENTINEL_TX_HASH,
            },
        }
    }
}

impl AlertBuilder {
    /// Starts from a MALICIOUS alert with the sentinel hash.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flagged text.
    pub fn content(mut self, content: &str) -> Self {
        self.alert.content = content.to_string();
        self
    }

    /// Sets the author address.
    pub fn author(mut self, author: &str) -> Self {
        self.alert.author_address = author.to_string();
        self
    }

    /// Sets the detection time in unix seconds.
    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.alert.timestamp = timestamp;
        self
    }

    /// Sets the flag transaction hash.
    pub fn tx_hash(mut self, tx_hash: TxHash) -> Self {
        self.alert.tx_hash = tx_hash;
        self
    }

    /// Builds the alert.
    pub fn build(self) -> Alert {
        self.alert
    }
}
