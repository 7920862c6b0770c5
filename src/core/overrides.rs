// src/core/overrides.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-defined replacement words, keyed by uppercase letter.
///
/// Every key is in `A..=Z`, no key maps to an empty list, and no list holds
/// the same word twice. A key being present means "this letter has an override".
/// Mutators consume the dictionary and hand back the next one, so callers see
/// each edit as a whole-dictionary replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, StoredWords>", into = "BTreeMap<String, Vec<String>>")]
pub struct OverrideDictionary {
    words: BTreeMap<char, Vec<String>>,
}

/// Accepts both the list form and the older single-word form `{"M": "Mancy"}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredWords {
    One(String),
    Many(Vec<String>),
}

/// Turns free-form letter input into an override key.
/// Takes the first non-blank character, uppercased; anything outside `A..=Z` is rejected.
pub fn normalize_letter(input: &str) -> Option<char> {
    let letter = input.trim().chars().next()?.to_ascii_uppercase();
    letter.is_ascii_uppercase().then_some(letter)
}

impl OverrideDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `word` to the letter's list. Invalid letters, blank words and
    /// words already present for the letter leave the dictionary unchanged.
    #[must_use]
    pub fn add_word(mut self, letter: char, word: &str) -> Self {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return self;
        }
        let word = word.trim();
        if word.is_empty() {
            return self;
        }
        let list = self.words.entry(letter).or_default();
        if !list.iter().any(|w| w == word) {
            list.push(word.to_string());
        }
        self
    }

    /// Removes the first exact match of `word`; drops the letter when its list empties.
    #[must_use]
    pub fn remove_word(mut self, letter: char, word: &str) -> Self {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return self;
        }
        if let Some(list) = self.words.get_mut(&letter) {
            if let Some(pos) = list.iter().position(|w| w == word) {
                list.remove(pos);
            }
            if list.is_empty() {
                self.words.remove(&letter);
            }
        }
        self
    }

    /// Override words for a letter, matched case-insensitively.
    pub fn get(&self, letter: char) -> Option<&[String]> {
        self.words
            .get(&letter.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    pub fn contains(&self, letter: char) -> bool {
        self.words.contains_key(&letter.to_ascii_uppercase())
    }

    /// Letters in alphabetical order with their words in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &[String])> {
        self.words.iter().map(|(&letter, words)| (letter, words.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of letters with an override.
    pub fn len(&self) -> usize {
        self.words.len()
    }
}

impl From<BTreeMap<String, StoredWords>> for OverrideDictionary {
    fn from(stored: BTreeMap<String, StoredWords>) -> Self {
        let mut dict = OverrideDictionary::new();
        for (key, words) in stored {
            // Keys must be exactly one letter; "Mx" is not a shorthand for "M".
            let mut chars = key.chars();
            let (Some(letter), None) = (chars.next(), chars.next()) else {
                tracing::debug!(key = %key, "dropping override key that is not a single letter");
                continue;
            };
            let words = match words {
                StoredWords::One(word) => vec![word],
                StoredWords::Many(words) => words,
            };
            for word in &words {
                dict = dict.add_word(letter, word);
            }
        }
        dict
    }
}

impl From<OverrideDictionary> for BTreeMap<String, Vec<String>> {
    fn from(dict: OverrideDictionary) -> Self {
        dict.words
            .into_iter()
            .map(|(letter, words)| (letter.to_string(), words))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(dict: &OverrideDictionary) {
        for (letter, words) in dict.iter() {
            assert!(letter.is_ascii_uppercase());
            assert!(!words.is_empty(), "{letter} maps to an empty list");
            for (i, w) in words.iter().enumerate() {
                assert!(!words[i + 1..].contains(w), "{letter} has duplicate {w}");
            }
        }
    }

    #[test]
    fn add_then_remove_drops_the_letter() {
        let dict = OverrideDictionary::new().add_word('A', "Archer");
        assert_eq!(dict.get('A'), Some(&["Archer".to_string()][..]));

        let dict = dict.remove_word('A', "Archer");
        assert!(!dict.contains('A'));
        assert!(dict.is_empty());
    }

    #[test]
    fn add_rejects_bad_input() {
        let dict = OverrideDictionary::new()
            .add_word('1', "One")
            .add_word('!', "Bang")
            .add_word('é', "Eclair")
            .add_word('B', "   ");
        assert!(dict.is_empty());
    }

    #[test]
    fn add_normalizes_letter_and_word() {
        let dict = OverrideDictionary::new().add_word('m', "  Mancy ");
        assert_eq!(dict.get('M'), Some(&["Mancy".to_string()][..]));
        assert_eq!(dict.get('m'), Some(&["Mancy".to_string()][..]));
    }

    #[test]
    fn duplicates_are_case_sensitive_noops() {
        let dict = OverrideDictionary::new()
            .add_word('M', "Mancy")
            .add_word('M', "Mancy")
            .add_word('M', " Mancy")
            .add_word('M', "mancy");
        assert_eq!(dict.get('M').unwrap(), ["Mancy", "mancy"]);
    }

    #[test]
    fn insertion_order_is_kept() {
        let dict = OverrideDictionary::new()
            .add_word('M', "Mancy")
            .add_word('M', "Marshal")
            .add_word('M', "Maple");
        assert_eq!(dict.get('M').unwrap(), ["Mancy", "Marshal", "Maple"]);

        let dict = dict.remove_word('M', "Marshal");
        assert_eq!(dict.get('M').unwrap(), ["Mancy", "Maple"]);
    }

    #[test]
    fn removing_a_missing_word_changes_nothing() {
        let dict = OverrideDictionary::new().add_word('H', "Harambe");
        let same = dict.clone().remove_word('H', "harambe").remove_word('Q', "Queen");
        assert_eq!(dict, same);
    }

    #[test]
    fn iteration_is_letter_sorted() {
        let dict = OverrideDictionary::new()
            .add_word('Z', "Zebra")
            .add_word('C', "Cat")
            .add_word('M', "Mancy");
        let letters: Vec<char> = dict.iter().map(|(l, _)| l).collect();
        assert_eq!(letters, vec!['C', 'M', 'Z']);
    }

    #[test]
    fn invariants_hold_over_mixed_edits() {
        let edits: &[(bool, char, &str)] = &[
            (true, 'a', "Apple"),
            (true, 'A', "Apple"),
            (true, 'A', "Ant"),
            (false, 'A', "Apple"),
            (true, 'b', "Bee"),
            (false, 'b', "Bee"),
            (false, 'b', "Bee"),
            (true, 'c', ""),
            (false, 'A', "Ant"),
            (true, 'A', "Ant"),
        ];
        let mut dict = OverrideDictionary::new();
        for &(add, letter, word) in edits {
            dict = if add {
                dict.add_word(letter, word)
            } else {
                dict.remove_word(letter, word)
            };
            assert_invariants(&dict);
        }
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get('A').unwrap(), ["Ant"]);
    }

    #[test]
    fn normalize_letter_takes_first_character() {
        assert_eq!(normalize_letter(" alpha"), Some('A'));
        assert_eq!(normalize_letter("z"), Some('Z'));
        assert_eq!(normalize_letter("9"), None);
        assert_eq!(normalize_letter("   "), None);
    }

    #[test]
    fn serializes_as_letter_keyed_lists() {
        let dict = OverrideDictionary::new()
            .add_word('M', "Mancy")
            .add_word('M', "Marshal");
        let json = serde_json::to_string(&dict).unwrap();
        assert_eq!(json, r#"{"M":["Mancy","Marshal"]}"#);
        let back: OverrideDictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dict);
    }

    #[test]
    fn loads_single_word_payloads_and_cleans_up() {
        let json = r#"{"M":"Mancy","H":["Harambe","Harambe",""],"xy":["Nope"],"7":["Seven"],"Q":[]}"#;
        let dict: OverrideDictionary = serde_json::from_str(json).unwrap();
        assert_eq!(dict.get('M').unwrap(), ["Mancy"]);
        assert_eq!(dict.get('H').unwrap(), ["Harambe"]);
        assert_eq!(dict.len(), 2);
        assert_invariants(&dict);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Edit {
            Add(char, String),
            Remove(char, String),
        }

        fn arb_letter() -> impl Strategy<Value = char> {
            prop_oneof![
                (b'A'..=b'E').prop_map(char::from),
                (b'a'..=b'e').prop_map(char::from),
                Just('1'),
                Just('é'),
            ]
        }

        /// A small word pool so removals and duplicates actually hit.
        fn arb_word() -> impl Strategy<Value = String> {
            prop_oneof![
                prop::sample::select(vec!["Apple", "apple", "Bee", " Bee ", "Cat", "", "  "])
                    .prop_map(|w| w.to_string()),
                "[A-Za-z ]{0,6}",
            ]
        }

        fn arb_edit() -> impl Strategy<Value = Edit> {
            prop_oneof![
                (arb_letter(), arb_word()).prop_map(|(l, w)| Edit::Add(l, w)),
                (arb_letter(), arb_word()).prop_map(|(l, w)| Edit::Remove(l, w)),
            ]
        }

        proptest! {
            #[test]
            fn prop_edits_keep_lists_nonempty_and_unique(
                edits in prop::collection::vec(arb_edit(), 0..40)
            ) {
                let mut dict = OverrideDictionary::new();
                for edit in edits {
                    dict = match edit {
                        Edit::Add(letter, word) => dict.add_word(letter, &word),
                        Edit::Remove(letter, word) => dict.remove_word(letter, &word),
                    };
                    assert_invariants(&dict);
                }
            }

            #[test]
            fn prop_add_then_remove_restores(
                edits in prop::collection::vec(arb_edit(), 0..20),
                letter in (b'A'..=b'Z').prop_map(char::from),
                word in "[A-Za-z]{1,8}"
            ) {
                let mut dict = OverrideDictionary::new();
                for edit in edits {
                    dict = match edit {
                        Edit::Add(l, w) => dict.add_word(l, &w),
                        Edit::Remove(l, w) => dict.remove_word(l, &w),
                    };
                }
                prop_assume!(!dict.get(letter).is_some_and(|ws| ws.contains(&word)));
                let restored = dict.clone().add_word(letter, &word).remove_word(letter, &word);
                prop_assert_eq!(restored, dict);
            }
        }
    }
}
