//! System instructions for each conversation mode.

use serde::Deserialize;

pub const HEALTH_PROMPT: &str = "당신은 '하루동행' 시니어 건강 도우미입니다.
간호사처럼 차분하고 단정하지 않습니다.
수치 하나만으로 판단하지 않습니다.
항상 2~3문장, 질문은 1개만 합니다.";

pub const MOOD_PROMPT: &str = "너는 시니어의 감정을 다정하게 들어주고 공감해주는 하루동행 감정 케어 봇이야. 말투는 존댓말이고, 길지 않게 3~4문장 정도로 따뜻하게 답해줘.";

pub const MESSAGE_PROMPT: &str = "너는 시니어가 보호자에게 전하고 싶은 마음을 예쁘게 정리해 주는 하루동행 메시지 정리 봇이야. 말투는 존댓말이고, 3~5문장 안에서 따뜻하게 정리해 줘.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Mode {
    #[default]
    Health,
    Mood,
    Message,
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mood" => Mode::Mood,
            "message" => Mode::Message,
            _ => Mode::Health,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Personas {
    pub health: String,
    pub mood: String,
    pub message: String,
}

impl Default for Personas {
    fn default() -> Self {
        Self {
            health: HEALTH_PROMPT.to_string(),
            mood: MOOD_PROMPT.to_string(),
            message: MESSAGE_PROMPT.to_string(),
        }
    }
}

impl Personas {
    pub fn system_prompt(&self, mode: Mode) -> &str {
        match mode {
            Mode::Health => &self.health,
            Mode::Mood => &self.mood,
            Mode::Message => &self.message,
        }
    }
}

/// User turn sent once a heard number has been confirmed.
pub fn explanation_prompt(number: u32) -> String {
    format!(
        "공복 혈당 {number}에 대해 한 번의 수치로 단정하지 말고 2~3문장으로 설명하고 질문 1개만 해 주세요."
    )
}
