use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Conversation is empty")]
    EmptyConversation,

    #[error("Failed to render system prompt: {0}")]
    Prompt(#[from] tera::Error),

    #[error("Completion provider failed: {0}")]
    Provider(#[from] anyhow::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
