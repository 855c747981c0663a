//! Confirm-before-use dialogue for numbers heard in free text.
//!
//! A number picked out of a (possibly transcribed) message is never explained
//! straight away. The user is first asked to answer with one of the exact
//! affirmatives; only then does the turn go to the language model. The state
//! is carried by the caller between turns, nothing is kept in the process.

pub mod classify;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use classify::{classify, extract_number, UserReply};

pub const AFFIRM_OR_DENY: &str = "맞으면 '맞아', 아니면 '아니야'라고 말씀해 주세요.";
pub const RESTATE_DIGITS: &str = "숫자를 다시 한 자리씩 말씀해 주세요. 예: 1, 4, 5";
pub const ASK_NUMBER_AGAIN: &str = "숫자를 한 번만 다시 말씀해 주세요.";

/// Confirmation data round-tripped through the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "PendingWire")]
pub struct PendingConfirmation {
    pub awaiting_confirmation: bool,
    pub heard_number: Option<u32>,
}

// Callers echo whichever flag they last saw, sometimes several at once.
#[derive(Deserialize)]
struct PendingWire {
    #[serde(default, rename = "pendingNumericConfirm", deserialize_with = "strict_true")]
    pending_numeric_confirm: bool,
    #[serde(default, rename = "awaitingConfirmation", deserialize_with = "strict_true")]
    awaiting_confirmation: bool,
    #[serde(default, rename = "needConfirm", deserialize_with = "strict_true")]
    need_confirm: bool,
    #[serde(default, rename = "heardNumber", deserialize_with = "finite_number")]
    heard_number: Option<u32>,
}

impl From<PendingWire> for PendingConfirmation {
    fn from(w: PendingWire) -> Self {
        PendingConfirmation {
            awaiting_confirmation: w.pending_numeric_confirm || w.awaiting_confirmation || w.need_confirm,
            heard_number: w.heard_number,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogueState {
    #[default]
    Idle,
    /// Waiting for an exact yes/no. The number is `None` after a denial or
    /// when the caller lost it.
    AwaitingConfirmation(Option<u32>),
}

impl DialogueState {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, DialogueState::AwaitingConfirmation(_))
    }

    pub fn heard_number(&self) -> Option<u32> {
        match self {
            DialogueState::Idle => None,
            DialogueState::AwaitingConfirmation(n) => *n,
        }
    }
}

impl From<PendingConfirmation> for DialogueState {
    fn from(p: PendingConfirmation) -> Self {
        if p.awaiting_confirmation {
            DialogueState::AwaitingConfirmation(p.heard_number)
        } else {
            DialogueState::Idle
        }
    }
}

impl From<DialogueState> for PendingConfirmation {
    fn from(state: DialogueState) -> Self {
        PendingConfirmation {
            awaiting_confirmation: state.is_awaiting(),
            heard_number: state.heard_number(),
        }
    }
}

/// What to do with one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Answer directly, no model call.
    Prompt { reply: String, next: DialogueState },
    /// The number was confirmed; ask the model to explain it. Next state is `Idle`.
    Explain { number: u32 },
    /// Ordinary conversation. Next state is `Idle`.
    Converse { text: String },
}

pub fn confirmation_prompt(number: u32) -> String {
    format!("제가 이렇게 들었어요: {number}\n{AFFIRM_OR_DENY}")
}

fn ask_to_confirm(number: u32) -> Step {
    Step::Prompt {
        reply: confirmation_prompt(number),
        next: DialogueState::AwaitingConfirmation(Some(number)),
    }
}

fn prompt(reply: &str, next: DialogueState) -> Step {
    Step::Prompt {
        reply: reply.to_string(),
        next,
    }
}

pub fn step(state: DialogueState, text: &str) -> Step {
    let text = text.trim();
    match state {
        DialogueState::Idle => match extract_number(text) {
            Some(n) => ask_to_confirm(n),
            None => Step::Converse {
                text: text.to_string(),
            },
        },
        DialogueState::AwaitingConfirmation(heard) => match classify(text) {
            UserReply::Affirm => match heard {
                Some(number) => Step::Explain { number },
                None => prompt(ASK_NUMBER_AGAIN, DialogueState::AwaitingConfirmation(None)),
            },
            UserReply::Deny => prompt(RESTATE_DIGITS, DialogueState::AwaitingConfirmation(None)),
            UserReply::Number(n) => ask_to_confirm(n),
            UserReply::Loose | UserReply::Other => prompt(AFFIRM_OR_DENY, state),
        },
    }
}

// Only a JSON `true` starts the confirmation branch.
fn strict_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(matches!(value, Some(Value::Bool(true))))
}

// Anything that is not a whole, non-negative, finite number counts as missing.
fn finite_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(|v| {
        v.as_u64()
            .or_else(|| {
                v.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok())
    }))
}
