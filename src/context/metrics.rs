use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Label;

/// A struct to hold application metrics.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// The time the application started.
    pub start_time: tokio::time::Instant,
    /// Submissions that reached a verdict.
    pub analyzed: u64,
    /// SAFE verdicts.
    pub safe: u64,
    /// MALICIOUS verdicts.
    pub malicious: u64,
    /// Flag transactions accepted by the destination chain.
    pub flagged: u64,
    /// The latest source-chain block whose events have been processed.
    pub latest_processed_block: Option<u64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            start_time: tokio::time::Instant::now(),
            analyzed: 0,
            safe: 0,
            malicious: 0,
            flagged: 0,
            latest_processed_block: None,
        }
    }
}

/// Shared application metrics for the HTTP server.
#[derive(Clone, Default)]
pub struct AppMetrics {
    /// Shared metrics.
    pub metrics: Arc<RwLock<Metrics>>,
}

impl AppMetrics {
    /// Counts one verdict.
    pub async fn record_verdict(&self, label: Label) {
        let mut metrics = self.metrics.write().await;
        metrics.analyzed += 1;
        match label {
            Label::Safe => metrics.safe += 1,
            Label::Malicious => metrics.malicious += 1,
        }
    }

    /// Counts one accepted flag transaction.
    pub async fn record_flagged(&self) {
        self.metrics.write().await.flagged += 1;
    }

    /// Records how far ingestion has got.
    pub async fn record_processed_block(&self, block_number: u64) {
        self.metrics.write().await.latest_processed_block = Some(block_number);
    }

    /// A copy of the current values.
    pub async fn snapshot(&self) -> Metrics {
        self.metrics.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters() {
        let metrics = AppMetrics::default();
        metrics.record_verdict(Label::Safe).await;
        metrics.record_verdict(Label::Malicious).await;
        metrics.record_verdict(Label::Malicious).await;
        metrics.record_flagged().await;
        metrics.record_processed_block(42).await;

        let snapshot = metrics.snapshot().await;
        assert_eq!(snapshot.analyzed, 3);
        assert_eq!(snapshot.safe, 1);
        assert_eq!(snapshot.malicious, 2);
        assert_eq!(snapshot.flagged, 1);
        assert_eq!(snapshot.latest_processed_block, Some(42));
    }
}
