//! These models represent the objects passed through the chat pipeline
//!
//! There are a few related formats we need to interact with:
//! - vercel useChat messages, sent from the interface to the assistant
//! - vercel data stream frames, sent from the assistant to the interface
//! - openai-compatible chat messages, sent from the assistant to the LLM
//! - openweathermap payloads, received from the weather provider
//!
//! Client messages map onto `Message` directly. Weather payloads are normalized into
//! `WeatherReport` before they ever reach a message.
pub mod message;
pub mod weather;
