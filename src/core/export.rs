// src/core/export.rs
use crate::core::types::{Token, TokenClass};

/// Separator between tokens in a flat readback.
pub const READBACK_DELIMITER: &str = " | ";

/// Renders tokens as one line of `"<CHAR> as in <WORD>"` phrases.
/// With `verbose_numbers` off, digits are read back bare.
pub fn readback(tokens: &[Token], verbose_numbers: bool) -> String {
    tokens
        .iter()
        .map(|token| {
            let character: String = token.character.to_uppercase().collect();
            if token.class == TokenClass::Number && !verbose_numbers {
                character
            } else {
                format!("{} as in {}", character, token.rendered_word)
            }
        })
        .collect::<Vec<_>>()
        .join(READBACK_DELIMITER)
}

/// `"1 character"`, `"12 characters"`.
pub fn character_count(tokens: &[Token]) -> String {
    let n = tokens.len();
    format!("{} character{}", n, if n == 1 { "" } else { "s" })
}
