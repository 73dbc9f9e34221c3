use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::models::message::Message;

/// Ordered text deltas of a single completion, ending when the provider finishes
pub type DeltaStream = BoxStream<'static, Result<String>>;

/// Base trait for streaming chat completion providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Start a streaming completion over the full message list.
    ///
    /// Resolves once the provider has accepted the request; deltas are then read
    /// lazily as the returned stream is polled. Deltas may be empty.
    async fn stream(&self, messages: &[Message]) -> Result<DeltaStream>;
}
