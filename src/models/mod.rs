//! Data models shared across the oracle.

pub mod alert;
pub mod classification;
pub mod content_event;
pub mod submission;

pub use alert::{Alert, SENTINEL_TX_HASH};
pub use classification::{ClassificationResult, Label};
pub use content_event::{ContentEvent, EventDecodeError, EventKey};
pub use submission::{AnalysisResponse, ContentSubmission};
