use crate::core::converter::classify_with_rng;
use crate::core::export::readback;
use crate::core::types::Token;
use crate::persistence::{FileStore, KeyValueStore};
use crate::preferences::{Overrides, PreferenceState, PreferenceStore, Suppress};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// The application context: preferences, the text being spelled, and the
/// random source for multi-word overrides.
///
/// Tokens are never cached. Every call to [`SoupEngine::tokens`] spells the
/// current input against the current overrides from scratch.
pub struct SoupEngine<S: KeyValueStore> {
    preferences: PreferenceStore<S>,
    input: String,
    rng: StdRng,
}

impl SoupEngine<FileStore> {
    /// Opens the preference file at `path`. A corrupt file starts over from
    /// defaults; an unreadable one runs on defaults without saving.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let store = FileStore::open_or_empty(path);
        tracing::debug!(
            path = %store.path().display(),
            detached = store.is_detached(),
            "using preference file"
        );
        Self::new(store)
    }
}

impl<S: KeyValueStore> SoupEngine<S> {
    pub fn new(backend: S) -> Self {
        Self {
            preferences: PreferenceStore::load(backend),
            input: String::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixes the random source so multi-word overrides draw reproducibly.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn state(&self) -> &PreferenceState {
        self.preferences.state()
    }

    pub fn preferences(&self) -> &PreferenceStore<S> {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut PreferenceStore<S> {
        &mut self.preferences
    }

    /// Spells the current input.
    pub fn tokens(&mut self) -> Vec<Token> {
        let state = self.preferences.state();
        classify_with_rng(
            &self.input,
            &state.override_dictionary,
            state.suppress_overrides,
            &mut self.rng,
        )
    }

    /// The current input as a flat `"X as in Word | ..."` line.
    pub fn readback(&mut self) -> String {
        let tokens = self.tokens();
        readback(&tokens, self.state().verbose_numbers)
    }

    pub fn add_override(&mut self, letter: char, word: &str) {
        self.preferences
            .update::<Overrides>(|dict| dict.add_word(letter, word));
    }

    pub fn remove_override(&mut self, letter: char, word: &str) {
        self.preferences
            .update::<Overrides>(|dict| dict.remove_word(letter, word));
    }

    /// Flips suppression and returns the new setting.
    pub fn toggle_suppression(&mut self) -> bool {
        self.preferences.update::<Suppress>(|on| !on);
        self.state().suppress_overrides
    }
}
