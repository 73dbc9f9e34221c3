use anyhow::{anyhow, Result};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};

use super::base::DeltaStream;
use crate::models::message::Message;

/// Convert internal Message format to OpenAI's API message specification
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            let mut converted = json!({
                "role": message.role,
                "content": message.content,
            });
            if let (Some(name), Some(object)) = (&message.name, converted.as_object_mut()) {
                object.insert("name".to_string(), json!(name));
            }
            converted
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Delta(String),
    Done,
}

/// Parse one server-sent event line of an OpenAI-compatible completion stream.
///
/// Lines that are not `data:` fields (comments, blank separators) yield `None`.
pub fn parse_sse_line(line: &str) -> Result<Option<SseEvent>> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return Ok(Some(SseEvent::Done));
    }

    let chunk: Value = serde_json::from_str(data)?;
    if let Some(error) = chunk.get("error") {
        return Err(anyhow!("Provider stream error: {}", error));
    }

    let content = chunk
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(Some(SseEvent::Delta(content.to_string())))
}

/// Splits a byte stream into lines, tolerating lines and multi-byte characters
/// that straddle chunk boundaries
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    // Bytes of `buffer` already known to hold no newline
    scanned: usize,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(offset) = self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=self.scanned + offset).collect();
            self.scanned = 0;
            if let Some(event) = parse_sse_line(std::str::from_utf8(&line)?)? {
                events.push(event);
            }
        }
        self.scanned = self.buffer.len();
        Ok(events)
    }

    fn finish(&mut self) -> Result<Vec<SseEvent>> {
        let rest = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        if rest.is_empty() {
            return Ok(Vec::new());
        }
        Ok(parse_sse_line(std::str::from_utf8(&rest)?)?
            .into_iter()
            .collect())
    }
}

/// Turn a raw server-sent event body into the completion's text deltas
pub fn sse_deltas<S, B, E>(chunks: S) -> DeltaStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut decoder = SseDecoder::default();
        let mut chunks = Box::pin(chunks);
        let mut finished = false;

        while !finished {
            let events = match chunks.next().await {
                Some(Ok(chunk)) => decoder.push(chunk.as_ref()),
                Some(Err(e)) => Err(e.into()),
                None => {
                    finished = true;
                    decoder.finish()
                }
            };

            match events {
                Ok(events) => {
                    for event in events {
                        match event {
                            SseEvent::Delta(text) => yield Ok(text),
                            SseEvent::Done => {
                                finished = true;
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    yield Err(e);
                    finished = true;
                }
            }
        }
    })
}
