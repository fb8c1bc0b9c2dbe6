//! The content engine: the analysis pipeline and the source-chain event
//! ingestor that feeds it.

pub mod event_ingestor;
pub mod pipeline;

pub use event_ingestor::{EventIngestor, IngestionError};
pub use pipeline::{ContentPipeline, PipelineError};
