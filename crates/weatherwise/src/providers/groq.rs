use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use super::base::{DeltaStream, Provider};
use super::configs::GroqProviderConfig;
use super::utils::{messages_to_openai_spec, sse_deltas};
use crate::models::message::Message;

pub struct GroqProvider {
    client: Client,
    config: GroqProviderConfig,
}

impl GroqProvider {
    pub fn new(config: GroqProviderConfig) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self { client, config })
    }

    async fn post(&self, payload: Value) -> Result<Response> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(anyhow!("Server error: {}", status))
            }
            status => Err(anyhow!(
                "Request failed: {}\nBody: {}",
                status,
                response.text().await.unwrap_or_default()
            )),
        }
    }
}

#[async_trait]
impl Provider for GroqProvider {
    async fn stream(&self, messages: &[Message]) -> Result<DeltaStream> {
        let mut payload = json!({
            "model": self.config.model,
            "stream": true,
            "messages": messages_to_openai_spec(messages),
        });

        if let Some(object) = payload.as_object_mut() {
            if let Some(temp) = self.config.temperature {
                object.insert("temperature".to_string(), json!(temp));
            }
            if let Some(tokens) = self.config.max_tokens {
                object.insert("max_tokens".to_string(), json!(tokens));
            }
        }

        debug!(
            "Starting completion: model={}, messages={}",
            self.config.model,
            messages.len()
        );
        let response = self.post(payload).await?;

        Ok(sse_deltas(response.bytes_stream()))
    }
}
