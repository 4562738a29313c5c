//! Stream transport seam.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use stream_client::{StreamClient, StreamError, StreamMessage};

/// A source of stream connections.
///
/// Abstracted so the connection manager can be exercised against a fake
/// transport in tests; [`StreamClient`] is the real implementation. Each
/// call opens a fresh connection; the previous stream must be dropped first
/// (the manager guarantees this by construction).
#[async_trait]
pub trait StreamTransport: Send + Sync {
    async fn connect(
        &self,
    ) -> Result<BoxStream<'static, Result<StreamMessage, StreamError>>, StreamError>;
}

#[async_trait]
impl StreamTransport for StreamClient {
    async fn connect(
        &self,
    ) -> Result<BoxStream<'static, Result<StreamMessage, StreamError>>, StreamError> {
        let stream = self.open_stream().await?;
        Ok(stream.boxed())
    }
}
