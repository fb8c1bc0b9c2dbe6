use thiserror::Error;

use crate::{classifier::ClassifierError, persistence::PersistenceError};

/// Errors that can occur during application context initialization.
#[derive(Debug, Error)]
pub enum AppContextError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// Persistence error.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// The classifier could not be constructed.
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}
