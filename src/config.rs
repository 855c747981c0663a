//! Per-deployment dialogue settings, read from the environment.

use tracing::warn;

use crate::{persona::Personas, postprocess::ReplyFilter};

pub const DEFAULT_HISTORY_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueConfig {
    pub personas: Personas,
    pub filter: ReplyFilter,
    /// Most recent caller-supplied turns forwarded to the model.
    pub history_limit: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            personas: Personas::default(),
            filter: ReplyFilter::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl DialogueConfig {
    /// `PERSONA_SYSTEM_PROMPT`, `REPLY_FILTER_PHRASES` (comma separated) and
    /// `HISTORY_LIMIT`. Unset or invalid values keep the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(prompt) = lookup("PERSONA_SYSTEM_PROMPT").filter(|p| !p.trim().is_empty()) {
            config.personas.health = prompt;
        }

        if let Some(phrases) = lookup("REPLY_FILTER_PHRASES") {
            config.filter = ReplyFilter::new(phrases.split(',').map(str::trim));
        }

        if let Some(raw) = lookup("HISTORY_LIMIT") {
            match raw.trim().parse() {
                Ok(limit) => config.history_limit = limit,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid HISTORY_LIMIT"),
            }
        }

        config
    }
}
