use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::models::message::Message;
use crate::providers::base::{DeltaStream, Provider};

/// A mock provider that streams pre-configured deltas for testing
#[derive(Default)]
pub struct MockProvider {
    deltas: Vec<String>,
    fail_after: Option<usize>,
    reject: bool,
    received: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockProvider {
    /// Create a new mock provider that streams the given deltas in order
    pub fn new<S: Into<String>>(deltas: Vec<S>) -> Self {
        Self {
            deltas: deltas.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Yield an error instead of any deltas after the first `count`
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Refuse to start the completion at all
    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Every message list the provider has been asked to complete
    pub fn received(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.received)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn stream(&self, messages: &[Message]) -> Result<DeltaStream> {
        self.received.lock().unwrap().push(messages.to_vec());
        if self.reject {
            return Err(anyhow!("Request failed: 401 Unauthorized"));
        }

        let mut items: Vec<Result<String>> = self.deltas.iter().cloned().map(Ok).collect();
        if let Some(count) = self.fail_after {
            items.truncate(count);
            items.push(Err(anyhow!("connection reset by provider")));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }
}
