use serde::{Deserialize, Serialize};

use crate::dialogue::{DialogueState, PendingConfirmation};
use crate::persona::Mode;

pub const MAX_MESSAGE_CHARS: usize = 2000;

/// A prior turn echoed back by the caller.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(flatten)]
    pub pending: PendingConfirmation,
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();
        let message = self.message.trim();
        if message.is_empty() {
            issues.push("message is empty".into());
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            issues.push(format!("message exceeds {MAX_MESSAGE_CHARS} characters"));
        }
        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub need_confirm: bool,
    pub heard_number: Option<u32>,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>, next: DialogueState) -> Self {
        Self {
            reply: reply.into(),
            need_confirm: next.is_awaiting(),
            heard_number: next.heard_number(),
        }
    }

    pub fn state(&self) -> DialogueState {
        PendingConfirmation {
            awaiting_confirmation: self.need_confirm,
            heard_number: self.heard_number,
        }
        .into()
    }
}
