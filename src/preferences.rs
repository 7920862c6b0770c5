// File: src/preferences.rs
use crate::appearance::{FontId, Palette, ThemeMode};
use crate::core::overrides::OverrideDictionary;
use crate::persistence::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// One-off notices the user can dismiss for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeId {
    /// "Custom words suppressed, showing NATO standard only."
    SuppressedOverrides,
    /// "Preferences are saved automatically."
    AutoSave,
}

/// Everything the user can configure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceState {
    pub theme_mode: ThemeMode,
    pub accent_palette: Palette,
    pub colorblind_mode: bool,
    pub font: FontId,
    pub suppress_overrides: bool,
    pub verbose_numbers: bool,
    pub override_dictionary: OverrideDictionary,
    pub dismissed_notices: BTreeSet<NoticeId>,
}

impl PreferenceState {
    /// The palette in effect. Colorblind mode replaces the user's colors outright.
    pub fn effective_palette(&self) -> Palette {
        if self.colorblind_mode {
            Palette::colorblind()
        } else {
            self.accent_palette.clone()
        }
    }

    /// Whether per-category color pickers should be enabled.
    pub fn color_editing_enabled(&self) -> bool {
        !self.colorblind_mode
    }

    pub fn has_overrides(&self) -> bool {
        !self.override_dictionary.is_empty()
    }

    /// Whether overrides actually apply to spelled output right now.
    pub fn overrides_active(&self) -> bool {
        self.has_overrides() && !self.suppress_overrides
    }

    pub fn should_show_notice(&self, notice: NoticeId) -> bool {
        if self.dismissed_notices.contains(&notice) {
            return false;
        }
        match notice {
            NoticeId::SuppressedOverrides => self.suppress_overrides && self.has_overrides(),
            NoticeId::AutoSave => true,
        }
    }
}

/// A typed handle on one persisted field of [`PreferenceState`].
pub trait Preference {
    type Value: Serialize + DeserializeOwned + Clone + PartialEq + Debug;

    /// Key in the durable store.
    const KEY: &'static str;

    fn get(state: &PreferenceState) -> &Self::Value;
    fn get_mut(state: &mut PreferenceState) -> &mut Self::Value;
}

macro_rules! preference {
    ($(#[$doc:meta])* $name:ident, $key:literal, $field:ident: $ty:ty) => {
        $(#[$doc])*
        pub struct $name;

        impl Preference for $name {
            type Value = $ty;
            const KEY: &'static str = $key;

            fn get(state: &PreferenceState) -> &$ty {
                &state.$field
            }

            fn get_mut(state: &mut PreferenceState) -> &mut $ty {
                &mut state.$field
            }
        }
    };
}

preference!(Theme, "as_theme", theme_mode: ThemeMode);
preference!(Accent, "as_colors", accent_palette: Palette);
preference!(Colorblind, "as_colorblind", colorblind_mode: bool);
preference!(Font, "as_font", font: FontId);
preference!(
    /// Hides all overrides without deleting them.
    Suppress, "as_suppress", suppress_overrides: bool
);
preference!(VerboseNumbers, "as_verboseNumbers", verbose_numbers: bool);
preference!(Overrides, "as_customWords", override_dictionary: OverrideDictionary);
preference!(DismissedNotices, "as_dismissedNotices", dismissed_notices: BTreeSet<NoticeId>);

/// Owns the preference state and mirrors every change into a durable store.
///
/// The in-memory state is authoritative: failed writes are logged and dropped,
/// and unreadable fields load as their defaults.
pub struct PreferenceStore<S: KeyValueStore> {
    state: PreferenceState,
    backend: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Hydrates from `backend`, falling back to the default field by field.
    pub fn load(backend: S) -> Self {
        let mut state = PreferenceState::default();
        load_field::<Theme>(&backend, &mut state);
        load_field::<Accent>(&backend, &mut state);
        load_field::<Colorblind>(&backend, &mut state);
        load_field::<Font>(&backend, &mut state);
        load_field::<Suppress>(&backend, &mut state);
        load_field::<VerboseNumbers>(&backend, &mut state);
        load_field::<Overrides>(&backend, &mut state);
        load_field::<DismissedNotices>(&backend, &mut state);
        tracing::info!(
            overrides = state.override_dictionary.len(),
            theme = ?state.theme_mode,
            "preferences loaded"
        );
        Self { state, backend }
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }

    pub fn get<P: Preference>(&self) -> &P::Value {
        P::get(&self.state)
    }

    /// Replaces one field and persists.
    pub fn set<P: Preference>(&mut self, value: P::Value) {
        self.update::<P>(|_| value);
    }

    /// Derives one field from its previous value and writes the full state,
    /// even when the value did not change.
    pub fn update<P: Preference>(&mut self, f: impl FnOnce(P::Value) -> P::Value) {
        let slot = P::get_mut(&mut self.state);
        let next = f(slot.clone());
        if *slot != next {
            tracing::debug!(key = P::KEY, value = ?next, "preference changed");
            *slot = next;
        }
        self.persist_all();
    }

    /// Writes every field. Failures are logged, never returned.
    fn persist_all(&mut self) {
        self.persist_field::<Theme>();
        self.persist_field::<Accent>();
        self.persist_field::<Colorblind>();
        self.persist_field::<Font>();
        self.persist_field::<Suppress>();
        self.persist_field::<VerboseNumbers>();
        self.persist_field::<Overrides>();
        self.persist_field::<DismissedNotices>();
    }

    fn persist_field<P: Preference>(&mut self) {
        let payload = match serde_json::to_string(P::get(&self.state)) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(key = P::KEY, error = %e, "could not serialize preference");
                return;
            }
        };
        if let Err(e) = self.backend.set(P::KEY, payload) {
            tracing::warn!(key = P::KEY, error = %e, "preference not persisted");
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }
}

fn load_field<P: Preference>(backend: &impl KeyValueStore, state: &mut PreferenceState) {
    let Some(raw) = backend.get(P::KEY) else {
        return;
    };
    match serde_json::from_str::<P::Value>(&raw) {
        Ok(value) => *P::get_mut(state) = value,
        Err(e) => tracing::warn!(key = P::KEY, error = %e, "malformed preference, using default"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::PaletteCategory;
    use crate::persistence::MemoryStore;

    fn customized_state() -> PreferenceState {
        PreferenceState {
            theme_mode: ThemeMode::Light,
            accent_palette: Palette::default().with_color(PaletteCategory::Symbol, "#abcdef"),
            colorblind_mode: true,
            font: FontId::FiraCode,
            suppress_overrides: true,
            verbose_numbers: true,
            override_dictionary: OverrideDictionary::new()
                .add_word('M', "Mancy")
                .add_word('M', "Marshal")
                .add_word('H', "Harambe"),
            dismissed_notices: [NoticeId::AutoSave].into_iter().collect(),
        }
    }

    fn set_all(store: &mut PreferenceStore<MemoryStore>, state: &PreferenceState) {
        store.set::<Theme>(state.theme_mode);
        store.set::<Accent>(state.accent_palette.clone());
        store.set::<Colorblind>(state.colorblind_mode);
        store.set::<Font>(state.font);
        store.set::<Suppress>(state.suppress_overrides);
        store.set::<VerboseNumbers>(state.verbose_numbers);
        store.set::<Overrides>(state.override_dictionary.clone());
        store.set::<DismissedNotices>(state.dismissed_notices.clone());
    }

    #[test]
    fn empty_backend_loads_defaults() {
        let store = PreferenceStore::load(MemoryStore::new());
        assert_eq!(store.state(), &PreferenceState::default());
        assert_eq!(store.state().theme_mode, ThemeMode::System);
        assert_eq!(store.state().font, FontId::JetbrainsMono);
    }

    #[test]
    fn set_then_load_round_trips_every_field() {
        let wanted = customized_state();
        let mut store = PreferenceStore::load(MemoryStore::new());
        set_all(&mut store, &wanted);
        assert_eq!(store.state(), &wanted);

        let reloaded = PreferenceStore::load(store.into_backend());
        assert_eq!(reloaded.state(), &wanted);
    }

    #[test]
    fn corrupt_fields_fall_back_individually() {
        let backend = MemoryStore::new()
            .with_raw(Theme::KEY, "\"dark\"")
            .with_raw(Font::KEY, "\"wingdings\"")
            .with_raw(Suppress::KEY, "{{{")
            .with_raw(Overrides::KEY, r#"{"M":"Mancy"}"#)
            .with_raw(Accent::KEY, r##"{"nato":"#000000"}"##);
        let store = PreferenceStore::load(backend);
        let state = store.state();
        assert_eq!(state.theme_mode, ThemeMode::Dark);
        assert_eq!(state.font, FontId::JetbrainsMono);
        assert!(!state.suppress_overrides);
        assert_eq!(state.accent_palette, Palette::default());
        assert_eq!(state.override_dictionary.get('M').unwrap(), ["Mancy"]);
    }

    #[test]
    fn update_derives_from_previous_value() {
        let mut store = PreferenceStore::load(MemoryStore::new());
        store.update::<Suppress>(|on| !on);
        assert!(store.state().suppress_overrides);
        store.update::<Suppress>(|on| !on);
        assert!(!store.state().suppress_overrides);

        store.update::<Overrides>(|d| d.add_word('A', "Archer"));
        store.update::<Overrides>(|d| d.add_word('A', "Ant"));
        assert_eq!(store.get::<Overrides>().get('A').unwrap(), ["Archer", "Ant"]);
    }

    #[test]
    fn write_failures_keep_in_memory_state() {
        let mut store = PreferenceStore::load(MemoryStore::failing());
        store.set::<Theme>(ThemeMode::Dark);
        store.update::<Overrides>(|d| d.add_word('Z', "Zed"));
        assert_eq!(store.state().theme_mode, ThemeMode::Dark);
        assert!(store.state().override_dictionary.contains('Z'));
        assert!(store.backend().is_empty());

        let fresh = PreferenceStore::load(store.into_backend());
        assert_eq!(fresh.state(), &PreferenceState::default());
    }

    #[test]
    fn repeating_a_set_retries_a_failed_write() {
        let mut store = PreferenceStore::load(MemoryStore::failing());
        store.set::<Theme>(ThemeMode::Dark);
        assert!(store.backend().is_empty());

        store.backend_mut().set_fail_writes(false);
        store.set::<Theme>(ThemeMode::Dark);
        assert_eq!(store.backend().get(Theme::KEY).as_deref(), Some("\"dark\""));

        let reloaded = PreferenceStore::load(store.into_backend());
        assert_eq!(reloaded.state().theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn each_change_is_written_immediately() {
        let mut store = PreferenceStore::load(MemoryStore::new());
        store.set::<VerboseNumbers>(true);
        assert_eq!(store.backend().get(VerboseNumbers::KEY).as_deref(), Some("true"));
        assert_eq!(store.backend().get(Theme::KEY).as_deref(), Some("\"system\""));
    }

    #[test]
    fn colorblind_palette_overrides_custom_colors() {
        let mut store = PreferenceStore::load(MemoryStore::new());
        store.update::<Accent>(|p| p.with_color(PaletteCategory::Nato, "#111111"));
        assert_eq!(store.state().effective_palette().nato, "#111111");
        assert!(store.state().color_editing_enabled());

        store.set::<Colorblind>(true);
        assert_eq!(store.state().effective_palette(), Palette::colorblind());
        assert!(!store.state().color_editing_enabled());
        // The user's own colors are kept for when colorblind mode is turned off.
        assert_eq!(store.state().accent_palette.nato, "#111111");
    }

    #[test]
    fn suppression_notice_needs_overrides_and_no_dismissal() {
        let mut store = PreferenceStore::load(MemoryStore::new());
        store.set::<Suppress>(true);
        assert!(!store.state().should_show_notice(NoticeId::SuppressedOverrides));

        store.update::<Overrides>(|d| d.add_word('M', "Mancy"));
        assert!(store.state().should_show_notice(NoticeId::SuppressedOverrides));
        assert!(!store.state().overrides_active());

        store.update::<DismissedNotices>(|mut set| {
            set.insert(NoticeId::SuppressedOverrides);
            set
        });
        assert!(!store.state().should_show_notice(NoticeId::SuppressedOverrides));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_palette() -> impl Strategy<Value = Palette> {
            prop::collection::vec(
                (prop::sample::select(PaletteCategory::ALL.to_vec()), "#[0-9a-fA-F]{6}"),
                0..6,
            )
            .prop_map(|edits| {
                edits
                    .iter()
                    .fold(Palette::default(), |p, (category, hex)| p.with_color(*category, hex))
            })
        }

        fn arb_dictionary() -> impl Strategy<Value = OverrideDictionary> {
            prop::collection::vec(((b'A'..=b'Z').prop_map(char::from), "[A-Za-z]{1,8}"), 0..10)
                .prop_map(|entries| {
                    entries
                        .iter()
                        .fold(OverrideDictionary::new(), |d, (letter, word)| d.add_word(*letter, word))
                })
        }

        fn arb_state() -> impl Strategy<Value = PreferenceState> {
            (
                prop_oneof![Just(ThemeMode::System), Just(ThemeMode::Light), Just(ThemeMode::Dark)],
                arb_palette(),
                any::<bool>(),
                prop::sample::select(FontId::ALL.to_vec()),
                any::<bool>(),
                any::<bool>(),
                arb_dictionary(),
                prop::sample::subsequence(vec![NoticeId::SuppressedOverrides, NoticeId::AutoSave], 0..=2),
            )
                .prop_map(
                    |(theme, palette, colorblind, font, suppress, verbose, dict, notices)| {
                        PreferenceState {
                            theme_mode: theme,
                            accent_palette: palette,
                            colorblind_mode: colorblind,
                            font,
                            suppress_overrides: suppress,
                            verbose_numbers: verbose,
                            override_dictionary: dict,
                            dismissed_notices: notices.into_iter().collect(),
                        }
                    },
                )
        }

        proptest! {
            #[test]
            fn prop_any_state_survives_a_reload(wanted in arb_state()) {
                let mut store = PreferenceStore::load(MemoryStore::new());
                set_all(&mut store, &wanted);
                prop_assert_eq!(store.state(), &wanted);

                let reloaded = PreferenceStore::load(store.into_backend());
                prop_assert_eq!(reloaded.state(), &wanted);
            }
        }
    }
}
