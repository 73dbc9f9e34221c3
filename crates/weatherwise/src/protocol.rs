//! Vercel AI SDK data stream frames.
//!
//! Each text delta travels as one line: `0:` followed by the delta as a JSON string
//! literal and a newline. Concatenating the decoded literals gives the full reply.

use anyhow::{anyhow, Result};

pub const TEXT_PREFIX: &str = "0:";
pub const STREAM_PROTOCOL_HEADER: &str = "x-vercel-ai-data-stream";
pub const STREAM_PROTOCOL_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame(String);

impl StreamFrame {
    /// Encode a single text delta
    pub fn text(delta: &str) -> Self {
        // Serializing a str cannot fail
        let encoded = serde_json::to_string(delta).unwrap_or_default();
        StreamFrame(format!("{}{}\n", TEXT_PREFIX, encoded))
    }

    /// Recover the text delta from an encoded frame line
    pub fn decode(line: &str) -> Result<String> {
        let literal = line
            .strip_suffix('\n')
            .unwrap_or(line)
            .strip_prefix(TEXT_PREFIX)
            .ok_or_else(|| anyhow!("Not a text frame: {}", line))?;
        Ok(serde_json::from_str(literal)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Decode a whole response body back into the reply text
pub fn decode_body(body: &str) -> Result<String> {
    body.lines()
        .filter(|line| !line.is_empty())
        .map(StreamFrame::decode)
        .collect()
}
