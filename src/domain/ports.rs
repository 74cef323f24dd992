use crate::core::routes::CompiledRequest;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The capability the client consumes to execute a compiled request.
///
/// Implementations return the parsed JSON body of a 2xx response and fail with
/// [`RsWikiError::Http`](crate::RsWikiError::Http) for any other status.
/// Timeouts and cancellation are the implementation's concern.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn fetch(&self, request: &CompiledRequest) -> Result<Value>;

    async fn close(&self) -> Result<()>;
}
