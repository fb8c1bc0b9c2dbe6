//! Chain access: RPC providers, the dual-chain gateway and the content event
//! source.

pub mod content_source;
pub mod gateway;
pub mod rpc;
pub mod traits;

pub use content_source::EvmContentSource;
pub use gateway::{Chain, ChainConnection, ChainGateway, ContractHandle, ContractName};
pub use rpc::{ProviderError, SharedProvider, create_provider};
pub use traits::{ContentEventSource, DataSourceError};
