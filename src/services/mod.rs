pub mod chat;
pub mod transcribe;
