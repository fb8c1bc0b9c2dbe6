//! Storage for the alert ledger and the ingestion cursor.

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use error::PersistenceError;
pub use memory::InMemoryAlertStore;
pub use sqlite::SqliteStateRepository;
pub use traits::{AlertStore, StateRepository};
