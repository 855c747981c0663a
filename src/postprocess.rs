/// Shown when filtering leaves nothing of the model's reply.
pub const EMPTY_REPLY: &str = "답변을 가져오지 못했어요.";

const DEFAULT_PHRASES: [&str; 2] = ["감사합니다", "고마워요"];

/// Removes phrases the assistant must not say from model replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyFilter {
    phrases: Vec<String>,
}

impl Default for ReplyFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASES)
    }
}

impl ReplyFilter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases = phrases
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.trim().is_empty())
            .collect();
        Self { phrases }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Strips the configured phrases from the start of the reply, including
    /// stacked openers such as "감사합니다. 고마워요!". Phrases later in the
    /// text are part of the sentence and stay.
    pub fn apply(&self, text: &str) -> String {
        let mut rest = trim_opener_punctuation(text);
        while let Some(phrase) = self.phrases.iter().find(|p| rest.starts_with(p.as_str())) {
            rest = trim_opener_punctuation(&rest[phrase.len()..]);
        }
        let cleaned = rest.trim_end();
        if cleaned.is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            cleaned.to_string()
        }
    }
}

// a removed opener leaves its punctuation behind
fn trim_opener_punctuation(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ',' | '!' | '~'))
}
