//! A set of helpers for testing

mod alert;
mod chain;
mod log;

pub use alert::AlertBuilder;
pub use chain::{TEST_SIGNER_KEY, mock_connection, mock_provider, unreachable_connection};
pub use log::{LogBuilder, content_submitted_log};
