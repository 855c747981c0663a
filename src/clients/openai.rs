use async_trait::async_trait;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use openai::Credentials;
use tracing::debug;

use super::{api_key_from_env, base_url_from_env, ChatModel, ChatTurn, EnvClient, Role};
use crate::error::{AppError, Result};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.4;
const MAX_TOKENS: u64 = 300;

pub struct OpenAiClient {
    creds: Credentials,
    model: String,
}

impl EnvClient for OpenAiClient {
    fn from_env() -> Result<Self> {
        let api_key = api_key_from_env()?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, base_url_from_env(), model))
    }
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            creds: Credentials::new(api_key, base_url),
            model,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        log_preview(turns);
        let messages: Vec<ChatCompletionMessage> = turns.iter().map(to_message).collect();

        let resp = ChatCompletion::builder(&self.model, messages)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .credentials(self.creds.clone())
            .create()
            .await
            .map_err(|e| AppError::External(e.to_string()))?;

        let assistant = resp
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        Ok(assistant)
    }
}

fn to_message(turn: &ChatTurn) -> ChatCompletionMessage {
    let role = match turn.role {
        Role::System => ChatCompletionMessageRole::System,
        Role::User => ChatCompletionMessageRole::User,
        Role::Assistant => ChatCompletionMessageRole::Assistant,
    };
    ChatCompletionMessage {
        role,
        content: Some(turn.content.clone()),
        name: None,
        function_call: None,
        tool_calls: None,
        tool_call_id: None,
    }
}

fn log_preview(turns: &[ChatTurn]) {
    for turn in turns {
        debug!(
            role = ?turn.role,
            len = turn.content.len(),
            preview = %turn.content.chars().take(80).collect::<String>(),
            "chat turn"
        );
    }
}
