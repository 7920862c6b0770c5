// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Which table (or override) produced a token's word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Nato,
    Number,
    Symbol,
    Custom,
    Unknown,
}

/// One input character rendered as a spoken word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub character: char,
    pub rendered_word: String,
    pub class: TokenClass,
    /// The NATO word the override replaced. Only set for `Custom` tokens.
    pub fallback_word: Option<&'static str>,
    /// Number of override words for the letter. Zero unless `Custom`.
    pub candidate_count: usize,
}

impl Token {
    pub fn standard(character: char, word: &str, class: TokenClass) -> Self {
        Self {
            character,
            rendered_word: word.to_string(),
            class,
            fallback_word: None,
            candidate_count: 0,
        }
    }

    /// The character as shown on a card: uppercased, with the space made visible.
    pub fn display_char(&self) -> String {
        if self.character == ' ' {
            "·".to_string()
        } else {
            self.character.to_uppercase().collect()
        }
    }
}
