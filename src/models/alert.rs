//! Alert records kept in the alert ledger.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};

use super::Label;

/// Transaction hash reported when flagging did not take effect: `0x`
/// followed by 64 zero characters.
pub const SENTINEL_TX_HASH: TxHash = TxHash::ZERO;

/// A record of one MALICIOUS verdict and the flagging attempt it caused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Unix seconds at which the content was analysed.
    pub timestamp: u64,
    pub content: String,
    pub author_address: String,
    pub classification: Label,
    /// Hash of the flag transaction, or [`SENTINEL_TX_HASH`].
    pub tx_hash: TxHash,
}

impl Alert {
    /// Whether the flagging transaction was actually submitted.
    pub fn was_flagged(&self) -> bool {
        self.tx_hash != SENTINEL_TX_HASH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_serializes_as_64_zero_hex_chars() {
        let alert = Alert {
            timestamp: 1_700_000_000,
            content: "claim now".into(),
            author_address: "0xabc".into(),
            classification: Label::Malicious,
            tx_hash: SENTINEL_TX_HASH,
        };
        let json = serde_json::to_value(&alert).unwrap();
        let expected = format!("0x{}", "0".repeat(64));
        assert_eq!(json["tx_hash"], expected.as_str());
        assert_eq!(json["classification"], "MALICIOUS");
        assert!(!alert.was_flagged());
    }
}
