use serde::Serialize;

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct TranscriptionReply {
    pub text: String,
}
