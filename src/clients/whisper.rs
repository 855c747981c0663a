use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::{api_key_from_env, base_url_from_env, EnvClient, Transcriber};
use crate::error::{AppError, Result};

const DEFAULT_MODEL: &str = "whisper-1";

#[derive(Deserialize)]
struct TranscriptionBody {
    text: String,
}

pub struct WhisperClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl EnvClient for WhisperClient {
    fn from_env() -> Result<Self> {
        let api_key = api_key_from_env()?;
        let model =
            std::env::var("OPENAI_TRANSCRIBE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: base_url_from_env(),
            model,
        })
    }
}

impl WhisperClient {
    fn endpoint(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<String> {
        let (file_name, mime) = audio_file(content_type);
        debug!(bytes = audio.len(), mime, model = %self.model, "sending audio for transcription");

        let part = Part::bytes(audio).file_name(file_name).mime_str(mime)?;
        let form = Form::new().text("model", self.model.clone()).part("file", part);

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(AppError::External(format!(
                "transcription failed: {status} - {detail}"
            )));
        }

        let body: TranscriptionBody = resp.json().await?;
        Ok(body.text)
    }
}

/// Upload name and mime type for a request `Content-Type`. Parameters such as
/// `;codecs=opus` are dropped; unknown types are sent as WAV.
pub fn audio_file(content_type: &str) -> (&'static str, &'static str) {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "audio/webm" | "video/webm" => ("audio.webm", "audio/webm"),
        "audio/mpeg" | "audio/mp3" => ("audio.mp3", "audio/mpeg"),
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => ("audio.m4a", "audio/mp4"),
        "audio/ogg" => ("audio.ogg", "audio/ogg"),
        _ => ("audio.wav", "audio/wav"),
    }
}
