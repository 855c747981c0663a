use crate::{
    clients::Transcriber,
    error::{AppError, Result},
    models::transcription::TranscriptionReply,
};

const DEFAULT_CONTENT_TYPE: &str = "audio/wav";

pub async fn transcribe(
    transcriber: &dyn Transcriber,
    audio: Vec<u8>,
    content_type: Option<&str>,
) -> Result<TranscriptionReply> {
    if audio.is_empty() {
        return Err(AppError::Validation("audio body is empty".into()));
    }
    let content_type = content_type
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let text = transcriber.transcribe(audio, content_type).await?;
    Ok(TranscriptionReply {
        text: text.trim().to_string(),
    })
}
