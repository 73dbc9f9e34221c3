use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};
use weatherwise::{
    assistant::FrameStream,
    errors::PipelineError,
    models::message::Message,
    protocol::{STREAM_PROTOCOL_HEADER, STREAM_PROTOCOL_VERSION},
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Streamed body of `0:` text frames
pub struct FrameResponse {
    frames: FrameStream,
}

impl FrameResponse {
    pub fn new(frames: FrameStream) -> Self {
        Self { frames }
    }
}

impl Stream for FrameResponse {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.frames).poll_next(cx).map(|opt| {
            opt.map(|frame| match frame {
                Ok(frame) => Ok(Bytes::from(frame.into_string())),
                Err(e) => {
                    tracing::error!("Completion stream failed: {}", e);
                    Err(io::Error::other(e.to_string()))
                }
            })
        })
    }
}

impl IntoResponse for FrameResponse {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::CACHE_CONTROL, "no-cache"),
                (
                    HeaderName::from_static(STREAM_PROTOCOL_HEADER),
                    STREAM_PROTOCOL_VERSION,
                ),
            ],
            Body::from_stream(self),
        )
            .into_response()
    }
}

fn error_response(status: StatusCode, error: &PipelineError) -> Response {
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

async fn handler(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    tracing::info!("Chat request with {} messages", request.messages.len());

    match state.assistant.reply(request.messages).await {
        Ok(frames) => FrameResponse::new(frames).into_response(),
        Err(e @ PipelineError::EmptyConversation) => {
            tracing::warn!("Rejected chat request: {}", e);
            error_response(StatusCode::BAD_REQUEST, &e)
        }
        Err(e @ PipelineError::Provider(_)) => {
            tracing::error!("Failed to start reply stream: {}", e);
            error_response(StatusCode::BAD_GATEWAY, &e)
        }
        Err(e) => {
            tracing::error!("Failed to prepare reply: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(handler))
        .with_state(state)
}
