pub use crate::error::{Result, UploadClientError};
pub use http_client::{build_http_client, AuthMiddleware};
pub use interface::{FilePayload, FileUploadClient, ProgressClient, UploadClient};
pub use memory_client::MemoryClient;
pub use remote_client::RemoteClient;

mod error;
mod http_client;
mod interface;
mod memory_client;
mod remote_client;
