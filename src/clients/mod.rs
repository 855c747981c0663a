pub mod openai;
pub mod whisper;

use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Chat completion endpoint: ordered role-tagged turns in, generated text out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String>;
}

/// Speech-to-text endpoint.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String>;
}

/// A client whose settings come from the environment.
pub trait EnvClient: Sized {
    fn from_env() -> Result<Self>;
}

/// Builds `T` from the environment when it is first called, so turns that
/// never reach the collaborator need no credentials. A missing key surfaces
/// as an error from `complete`/`transcribe`.
pub struct Deferred<T> {
    _client: PhantomData<fn() -> T>,
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self { _client: PhantomData }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: EnvClient + ChatModel> ChatModel for Deferred<T> {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        T::from_env()?.complete(turns).await
    }
}

#[async_trait]
impl<T: EnvClient + Transcriber> Transcriber for Deferred<T> {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String> {
        T::from_env()?.transcribe(audio, content_type).await
    }
}

pub(crate) fn api_key_from_env() -> Result<String> {
    std::env::var("OPENAI_API_KEY")
        .or_else(|_| std::env::var("OPENAI_KEY"))
        .map_err(|_| crate::AppError::External("Missing OPENAI_API_KEY".into()))
}

pub(crate) fn base_url_from_env() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1/".into())
}
