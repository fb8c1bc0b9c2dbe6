//! This module provides a concrete implementation of the StateRepository using
//! SQLite.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

use super::{error::PersistenceError, traits::StateRepository};
use crate::models::EventKey;

/// SQL statements for the ingestion cursor.
mod block_sql {
    pub const SELECT_LAST_PROCESSED_BLOCK: &str =
        "SELECT block_number FROM processed_blocks WHERE network_id = ?";

    pub const UPSERT_LAST_PROCESSED_BLOCK: &str =
        "INSERT OR REPLACE INTO processed_blocks (network_id, block_number) VALUES (?, ?)";
}

/// SQL statements for the event de-duplication keys.
mod event_sql {
    pub const SELECT_PROCESSED_EVENT: &str = "SELECT 1 FROM processed_events \
         WHERE network_id = ? AND tx_hash = ? AND log_index = ?";

    pub const INSERT_PROCESSED_EVENT: &str = "INSERT OR IGNORE INTO processed_events \
         (network_id, tx_hash, log_index, block_number) VALUES (?, ?, ?, ?)";

    /// Keys at or below the cursor can no longer be fetched again.
    pub const DELETE_EVENTS_UP_TO_BLOCK: &str =
        "DELETE FROM processed_events WHERE network_id = ? AND block_number <= ?";
}

/// A concrete implementation of the StateRepository using SQLite.
pub struct SqliteStateRepository {
    /// The SQLite connection pool used for database operations.
    pool: SqlitePool,
}

impl SqliteStateRepository {
    /// Creates a new instance of SqliteStateRepository with the provided
    /// database URL. This will create the database file if it does not
    /// exist.
    #[tracing::instrument(level = "info")]
    pub async fn new(database_url: &str) -> Result<Self, PersistenceError> {
        tracing::debug!(database_url, "Attempting to connect to SQLite database.");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| PersistenceError::InvalidInput(e.to_string()))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.map_err(|e| {
            PersistenceError::OperationFailed(format!("Failed to connect to database: {e}"))
        })?;
        tracing::info!(database_url, "Successfully connected to SQLite database.");
        Ok(Self { pool })
    }

    /// Runs database migrations.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn run_migrations(&self) -> Result<(), PersistenceError> {
        tracing::debug!("Running database migrations.");
        sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run database migrations.");
            PersistenceError::MigrationError(e.to_string())
        })?;
        tracing::info!("Database migrations completed successfully.");
        Ok(())
    }

    /// Closes the connection pool gracefully.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn close(&self) {
        tracing::debug!("Closing SQLite connection pool.");
        self.pool.close().await;
        tracing::info!("SQLite connection pool closed successfully.");
    }

    async fn execute_pragma(&self, pragma: &str) -> Result<(), PersistenceError> {
        sqlx::query(pragma).execute(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, pragma, "Failed to execute PRAGMA command.");
            PersistenceError::OperationFailed(e.to_string())
        })?;
        Ok(())
    }

    /// Helper to execute database queries with consistent error handling
    async fn execute_query_with_error_handling<F, T>(
        &self,
        operation: &str,
        query_fn: F,
    ) -> Result<T, PersistenceError>
    where
        F: std::future::Future<Output = Result<T, sqlx::Error>>,
    {
        query_fn.await.map_err(|e| {
            tracing::error!(error = %e, operation, "Database operation failed.");
            PersistenceError::OperationFailed(e.to_string())
        })
    }

    fn log_index_i64(key: &EventKey) -> Result<i64, PersistenceError> {
        i64::try_from(key.log_index).map_err(|e| PersistenceError::InvalidInput(e.to_string()))
    }
}

#[async_trait]
impl StateRepository for SqliteStateRepository {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_last_processed_block(
        &self,
        network_id: &str,
    ) -> Result<Option<u64>, PersistenceError> {
        let row: Option<(i64,)> = self
            .execute_query_with_error_handling(
                "query last processed block",
                sqlx::query_as(block_sql::SELECT_LAST_PROCESSED_BLOCK)
                    .bind(network_id)
                    .fetch_optional(&self.pool),
            )
            .await?;

        match row {
            Some((block_number,)) => {
                let block_number = u64::try_from(block_number).map_err(|error| {
                    tracing::error!(%error, network_id, "Failed to convert block_number from i64 to u64.");
                    PersistenceError::OperationFailed(error.to_string())
                })?;
                tracing::debug!(network_id, block_number, "Last processed block found.");
                Ok(Some(block_number))
            }
            None => {
                tracing::debug!(network_id, "No last processed block found.");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn set_last_processed_block(
        &self,
        network_id: &str,
        block_number: u64,
    ) -> Result<(), PersistenceError> {
        let block_number_i64 = i64::try_from(block_number).map_err(|error| {
            tracing::error!(%error, block_number, "Failed to convert block_number to i64 for database insertion.");
            PersistenceError::InvalidInput(error.to_string())
        })?;

        let mut tx = self
            .execute_query_with_error_handling("begin cursor update", self.pool.begin())
            .await?;
        self.execute_query_with_error_handling(
            "set last processed block",
            sqlx::query(block_sql::UPSERT_LAST_PROCESSED_BLOCK)
                .bind(network_id)
                .bind(block_number_i64)
                .execute(&mut *tx),
        )
        .await?;
        let pruned = self
            .execute_query_with_error_handling(
                "prune processed events",
                sqlx::query(event_sql::DELETE_EVENTS_UP_TO_BLOCK)
                    .bind(network_id)
                    .bind(block_number_i64)
                    .execute(&mut *tx),
            )
            .await?
            .rows_affected();
        self.execute_query_with_error_handling("commit cursor update", tx.commit()).await?;

        tracing::debug!(network_id, block_number, pruned, "Last processed block set successfully.");
        Ok(())
    }

    #[tracing::instrument(skip(self), level = "debug", fields(event = %key))]
    async fn is_event_processed(
        &self,
        network_id: &str,
        key: &EventKey,
    ) -> Result<bool, PersistenceError> {
        let row: Option<(i64,)> = self
            .execute_query_with_error_handling(
                "query processed event",
                sqlx::query_as(event_sql::SELECT_PROCESSED_EVENT)
                    .bind(network_id)
                    .bind(key.tx_hash.to_string())
                    .bind(Self::log_index_i64(key)?)
                    .fetch_optional(&self.pool),
            )
            .await?;
        Ok(row.is_some())
    }

    #[tracing::instrument(skip(self), level = "debug", fields(event = %key))]
    async fn mark_event_processed(
        &self,
        network_id: &str,
        key: &EventKey,
        block_number: u64,
    ) -> Result<(), PersistenceError> {
        let block_number =
            i64::try_from(block_number).map_err(|e| PersistenceError::InvalidInput(e.to_string()))?;
        self.execute_query_with_error_handling(
            "mark event processed",
            sqlx::query(event_sql::INSERT_PROCESSED_EVENT)
                .bind(network_id)
                .bind(key.tx_hash.to_string())
                .bind(Self::log_index_i64(key)?)
                .bind(block_number)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn cleanup(&self) -> Result<(), PersistenceError> {
        tracing::debug!("Performing state repository cleanup.");
        self.execute_pragma("PRAGMA wal_checkpoint(TRUNCATE)").await?;
        tracing::debug!("State repository cleanup completed.");
        Ok(())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn flush(&self) -> Result<(), PersistenceError> {
        tracing::debug!("Flushing pending writes to disk.");
        self.execute_pragma("PRAGMA synchronous = FULL").await?;
        self.execute_pragma("PRAGMA wal_checkpoint(TRUNCATE)").await?;
        self.execute_pragma("PRAGMA synchronous = NORMAL").await?;
        tracing::debug!("Pending writes flushed successfully.");
        Ok(())
    }
}
