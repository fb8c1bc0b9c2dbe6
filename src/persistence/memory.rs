//! In-process alert ledger.

use std::sync::{Arc, PoisonError, RwLock};

use super::traits::AlertStore;
use crate::models::Alert;

/// An [`AlertStore`] kept in memory for the lifetime of the process.
///
/// Alerts are stored behind `Arc`, so an append only pushes a pointer and a
/// snapshot copies pointers, never alert contents.
#[derive(Debug, Default)]
pub struct InMemoryAlertStore {
    alerts: RwLock<Vec<Arc<Alert>>>,
}

impl InMemoryAlertStore {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertStore for InMemoryAlertStore {
    fn append(&self, alert: Alert) {
        let mut alerts = self.alerts.write().unwrap_or_else(PoisonError::into_inner);
        alerts.push(Arc::new(alert));
        tracing::debug!(total = alerts.len(), "Alert appended to ledger.");
    }

    fn list(&self) -> Vec<Arc<Alert>> {
        self.alerts.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn latest(&self) -> Option<Arc<Alert>> {
        self.alerts.read().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    fn len(&self) -> usize {
        self.alerts.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
