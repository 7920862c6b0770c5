// src/core/converter.rs
use crate::core::overrides::OverrideDictionary;
use crate::core::tables::{letter_key, nato_word, number_word, symbol_word};
use crate::core::types::{Token, TokenClass};
use rand::seq::SliceRandom;
use rand::Rng;

/// Spells `input` one character at a time, drawing multi-word overrides from the thread RNG.
pub fn classify(input: &str, overrides: &OverrideDictionary, suppress: bool) -> Vec<Token> {
    classify_with_rng(input, overrides, suppress, &mut rand::thread_rng())
}

/// Same as [`classify`] with an explicit random source.
///
/// Overrides win over the tables unless `suppress` is set. A letter with
/// several override words gets a fresh uniform draw on every call; nothing
/// is cached between calls.
pub fn classify_with_rng<R: Rng + ?Sized>(
    input: &str,
    overrides: &OverrideDictionary,
    suppress: bool,
    rng: &mut R,
) -> Vec<Token> {
    input
        .chars()
        .map(|c| classify_char(c, overrides, suppress, rng))
        .collect()
}

fn classify_char<R: Rng + ?Sized>(
    c: char,
    overrides: &OverrideDictionary,
    suppress: bool,
    rng: &mut R,
) -> Token {
    let upper = letter_key(c);

    if !suppress {
        if let Some(words) = overrides.get(upper) {
            // A single candidate never touches the RNG.
            let picked = match words {
                [only] => Some(only),
                _ => words.choose(rng),
            };
            if let Some(word) = picked {
                return Token {
                    character: c,
                    rendered_word: word.clone(),
                    class: TokenClass::Custom,
                    fallback_word: nato_word(upper),
                    candidate_count: words.len(),
                };
            }
        }
    }

    if let Some(word) = nato_word(upper) {
        Token::standard(c, word, TokenClass::Nato)
    } else if let Some(word) = number_word(c) {
        Token::standard(c, word, TokenClass::Number)
    } else if let Some(word) = symbol_word(c) {
        Token::standard(c, word, TokenClass::Symbol)
    } else {
        Token::standard(c, &c.to_string(), TokenClass::Unknown)
    }
}
