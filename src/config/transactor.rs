use serde::Deserialize;

use super::SecretString;

fn default_gas_price_gwei() -> u64 {
    25
}

/// Signing settings for the guardian flagging transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactorConfig {
    /// Hex-encoded secp256k1 key of the flagging account. Supply it through
    /// `GUARDIAN__TRANSACTOR__PRIVATE_KEY`, not the YAML file.
    #[serde(default)]
    pub private_key: Option<SecretString>,

    /// Legacy gas price for the flag transaction, in gwei.
    #[serde(default = "default_gas_price_gwei")]
    pub gas_price_gwei: u64,
}

impl Default for TransactorConfig {
    fn default() -> Self {
        Self { private_key: None, gas_price_gwei: default_gas_price_gwei() }
    }
}

impl TransactorConfig {
    /// The configured gas price converted to wei.
    pub fn gas_price_wei(&self) -> u128 {
        u128::from(self.gas_price_gwei) * 1_000_000_000
    }
}
