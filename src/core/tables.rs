// src/core/tables.rs

/// Folds a character onto its `A..=Z` letter when its full uppercase form is
/// a single ASCII letter (`a`, `ı`, `ſ`). Everything else comes back as is.
pub fn letter_key(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if u.is_ascii_uppercase() => u,
        _ => c,
    }
}

/// Returns the NATO word for an uppercase ASCII letter.
pub fn nato_word(letter: char) -> Option<&'static str> {
    match letter {
        'A' => Some("Alpha"), 'B' => Some("Bravo"), 'C' => Some("Charlie"),
        'D' => Some("Delta"), 'E' => Some("Echo"), 'F' => Some("Foxtrot"),
        'G' => Some("Golf"), 'H' => Some("Hotel"), 'I' => Some("India"),
        'J' => Some("Juliet"), 'K' => Some("Kilo"), 'L' => Some("Lima"),
        'M' => Some("Mike"), 'N' => Some("November"), 'O' => Some("Oscar"),
        'P' => Some("Papa"), 'Q' => Some("Quebec"), 'R' => Some("Romeo"),
        'S' => Some("Sierra"), 'T' => Some("Tango"), 'U' => Some("Uniform"),
        'V' => Some("Victor"), 'W' => Some("Whiskey"), 'X' => Some("X-ray"),
        'Y' => Some("Yankee"), 'Z' => Some("Zulu"),
        _ => None,
    }
}

pub fn number_word(digit: char) -> Option<&'static str> {
    match digit {
        '0' => Some("Zero"), '1' => Some("One"), '2' => Some("Two"),
        '3' => Some("Three"), '4' => Some("Four"), '5' => Some("Five"),
        '6' => Some("Six"), '7' => Some("Seven"), '8' => Some("Eight"),
        '9' => Some("Nine"),
        _ => None,
    }
}

/// Symbol names are matched case-sensitively. The space is a symbol, not whitespace.
pub fn symbol_word(symbol: char) -> Option<&'static str> {
    match symbol {
        '-' => Some("Dash"), '_' => Some("Underscore"), '.' => Some("Period"),
        '/' => Some("Slash"), '\\' => Some("Backslash"), '@' => Some("At"),
        '#' => Some("Pound"), '$' => Some("Dollar"), '%' => Some("Percent"),
        '&' => Some("Ampersand"), '*' => Some("Asterisk"), '+' => Some("Plus"),
        '=' => Some("Equals"), '?' => Some("Question"), '!' => Some("Exclamation"),
        ':' => Some("Colon"), ';' => Some("Semicolon"), '(' => Some("Open-Paren"),
        ')' => Some("Close-Paren"), '[' => Some("Open-Bracket"),
        ']' => Some("Close-Bracket"), '<' => Some("Less-Than"),
        '>' => Some("Greater-Than"), ',' => Some("Comma"), '\'' => Some("Apostrophe"),
        '"' => Some("Quote"), ' ' => Some("Space"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_has_a_nato_word() {
        for letter in 'A'..='Z' {
            assert!(nato_word(letter).is_some(), "missing {letter}");
        }
        assert_eq!(nato_word('X'), Some("X-ray"));
        assert_eq!(nato_word('a'), None);
    }

    #[test]
    fn tables_are_disjoint() {
        for c in (0u8..=127).map(char::from) {
            let hits = [nato_word(c), number_word(c), symbol_word(c)]
                .iter()
                .filter(|w| w.is_some())
                .count();
            assert!(hits <= 1, "{c:?} is in more than one table");
        }
    }

    #[test]
    fn space_is_a_symbol() {
        assert_eq!(symbol_word(' '), Some("Space"));
        assert_eq!(symbol_word('\t'), None);
    }
}
