//! Per-signer nonce allocation.

use std::{sync::Arc, time::Duration};

use alloy::{primitives::Address, providers::Provider};
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Errors raised while seeding a nonce from the chain.
#[derive(Debug, Error)]
pub enum NonceError {
    /// The node rejected the request.
    #[error("could not read pending transaction count: {0}")]
    Rpc(String),

    /// The node did not answer in time.
    #[error("pending transaction count not returned within {0:?}")]
    Timeout(Duration),
}

/// Hands out nonces one signer at a time.
///
/// Each account has its own slot holding the next nonce to use. An empty slot
/// is seeded from the chain's pending transaction count. Only one
/// [`NonceReservation`] per account is alive at any moment, so concurrent
/// submissions from the same signer are serialized.
#[derive(Debug, Default)]
pub struct NonceManager {
    slots: DashMap<Address, Arc<Mutex<Option<u64>>>>,
}

impl NonceManager {
    /// Creates a manager with no seeded accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive use of `account`'s nonce and returns it.
    #[tracing::instrument(skip(self, provider), level = "debug")]
    pub async fn reserve(
        &self,
        account: Address,
        provider: &(dyn Provider + Send + Sync),
        call_timeout: Duration,
    ) -> Result<NonceReservation, NonceError> {
        let slot = self.slots.entry(account).or_default().clone();
        let mut guard = slot.lock_owned().await;

        let nonce = match *guard {
            Some(next) => next,
            None => {
                let count = tokio::time::timeout(
                    call_timeout,
                    provider.get_transaction_count(account).pending(),
                )
                .await
                .map_err(|_| NonceError::Timeout(call_timeout))?
                .map_err(|e| NonceError::Rpc(e.to_string()))?;
                tracing::debug!(%account, nonce = count, "Seeded nonce from chain.");
                *guard = Some(count);
                count
            }
        };

        Ok(NonceReservation { guard, nonce })
    }
}

/// Exclusive hold on one account's nonce.
///
/// Dropping the reservation without calling [`commit`](Self::commit) or
/// [`invalidate`](Self::invalidate) leaves the slot as it was.
#[derive(Debug)]
pub struct NonceReservation {
    guard: OwnedMutexGuard<Option<u64>>,
    nonce: u64,
}

impl NonceReservation {
    /// The nonce to sign with.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The transaction using this nonce was accepted; advance the counter.
    pub fn commit(mut self) {
        *self.guard = Some(self.nonce + 1);
    }

    /// The submission failed or timed out; re-read from the chain next time.
    pub fn invalidate(mut self) {
        *self.guard = None;
    }
}
