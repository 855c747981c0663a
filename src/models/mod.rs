pub mod chat;
pub mod transcription;
