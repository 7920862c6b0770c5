// File: src/appearance.rs
use crate::core::types::TokenClass;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

/// What the user picked for light/dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

/// The light/dark look actually in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Appearance::Dark
        } else {
            Appearance::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Appearance::Dark
    }
}

/// Stored by id (`"fira-code"`). Older payloads that hold the CSS stack
/// itself are accepted on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontId {
    #[default]
    #[serde(alias = "'JetBrains Mono', monospace")]
    JetbrainsMono,
    #[serde(alias = "'Courier New', monospace")]
    CourierNew,
    #[serde(alias = "'Fira Code', monospace")]
    FiraCode,
    #[serde(alias = "'IBM Plex Mono', monospace")]
    IbmPlexMono,
}

impl FontId {
    pub const ALL: [FontId; 4] = [
        FontId::JetbrainsMono,
        FontId::CourierNew,
        FontId::FiraCode,
        FontId::IbmPlexMono,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FontId::JetbrainsMono => "JetBrains Mono",
            FontId::CourierNew => "Courier New",
            FontId::FiraCode => "Fira Code",
            FontId::IbmPlexMono => "IBM Plex Mono",
        }
    }

    pub fn css_stack(self) -> &'static str {
        match self {
            FontId::JetbrainsMono => "'JetBrains Mono', monospace",
            FontId::CourierNew => "'Courier New', monospace",
            FontId::FiraCode => "'Fira Code', monospace",
            FontId::IbmPlexMono => "'IBM Plex Mono', monospace",
        }
    }

    /// Looks a font up by id (`fira-code`) or label (`Fira Code`), ignoring case.
    pub fn parse(name: &str) -> Option<FontId> {
        let wanted = name.trim().to_ascii_lowercase().replace(' ', "-");
        Self::ALL
            .into_iter()
            .find(|f| f.label().to_ascii_lowercase().replace(' ', "-") == wanted)
    }
}

/// Token classes that carry an accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCategory {
    Nato,
    Number,
    Symbol,
    Custom,
}

impl PaletteCategory {
    pub const ALL: [PaletteCategory; 4] = [
        PaletteCategory::Nato,
        PaletteCategory::Number,
        PaletteCategory::Symbol,
        PaletteCategory::Custom,
    ];

    pub fn of(class: TokenClass) -> Option<PaletteCategory> {
        match class {
            TokenClass::Nato => Some(PaletteCategory::Nato),
            TokenClass::Number => Some(PaletteCategory::Number),
            TokenClass::Symbol => Some(PaletteCategory::Symbol),
            TokenClass::Custom => Some(PaletteCategory::Custom),
            TokenClass::Unknown => None,
        }
    }

    pub fn parse(name: &str) -> Option<PaletteCategory> {
        match name.trim().to_ascii_lowercase().as_str() {
            "nato" => Some(PaletteCategory::Nato),
            "number" => Some(PaletteCategory::Number),
            "symbol" => Some(PaletteCategory::Symbol),
            "custom" => Some(PaletteCategory::Custom),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaletteCategory::Nato => "NATO Standard Letters",
            PaletteCategory::Number => "Numbers",
            PaletteCategory::Symbol => "Symbols",
            PaletteCategory::Custom => "Custom Override Words",
        }
    }
}

/// Accent colors per token class, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub nato: String,
    pub number: String,
    pub symbol: String,
    pub custom: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new("#60a5fa", "#fb923c", "#a78bfa", "#fbbf24")
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl Palette {
    fn new(nato: &str, number: &str, symbol: &str, custom: &str) -> Self {
        Self {
            nato: nato.to_string(),
            number: number.to_string(),
            symbol: symbol.to_string(),
            custom: custom.to_string(),
        }
    }

    /// High-contrast colors safe for the common forms of color blindness.
    pub fn colorblind() -> Self {
        Self::new("#0077BB", "#EE7733", "#AA3377", "#009988")
    }

    pub fn color(&self, category: PaletteCategory) -> &str {
        match category {
            PaletteCategory::Nato => &self.nato,
            PaletteCategory::Number => &self.number,
            PaletteCategory::Symbol => &self.symbol,
            PaletteCategory::Custom => &self.custom,
        }
    }

    fn slot(&mut self, category: PaletteCategory) -> &mut String {
        match category {
            PaletteCategory::Nato => &mut self.nato,
            PaletteCategory::Number => &mut self.number,
            PaletteCategory::Symbol => &mut self.symbol,
            PaletteCategory::Custom => &mut self.custom,
        }
    }

    /// Sets one category. Anything but `#rrggbb` is ignored.
    #[must_use]
    pub fn with_color(mut self, category: PaletteCategory, hex: &str) -> Self {
        let hex = hex.trim();
        if is_hex_color(hex) {
            *self.slot(category) = hex.to_string();
        }
        self
    }

    /// Puts one category back to its default color.
    #[must_use]
    pub fn reset(mut self, category: PaletteCategory) -> Self {
        *self.slot(category) = Palette::default().color(category).to_string();
        self
    }

    /// The color for a token class; `Unknown` tokens have none.
    pub fn color_for(&self, class: TokenClass) -> Option<&str> {
        PaletteCategory::of(class).map(|c| self.color(c))
    }

    /// Splits a color into RGB components.
    pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
        if !is_hex_color(hex) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some((channel(1)?, channel(3)?, channel(5)?))
    }
}

/// The host's light/dark preference.
pub trait AmbientSignal {
    /// Current preference; `true` means dark.
    fn prefers_dark(&self) -> bool;

    /// Takes the next pending change notification, if any.
    fn next_change(&mut self) -> Option<bool>;
}

/// An ambient signal fed through a channel, e.g. from a platform watcher thread.
#[derive(Debug)]
pub struct ChannelAmbient {
    dark: bool,
    changes: Receiver<bool>,
}

impl ChannelAmbient {
    pub fn new(initial_dark: bool) -> (Self, Sender<bool>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                dark: initial_dark,
                changes: rx,
            },
            tx,
        )
    }
}

impl AmbientSignal for ChannelAmbient {
    fn prefers_dark(&self) -> bool {
        self.dark
    }

    fn next_change(&mut self) -> Option<bool> {
        let dark = self.changes.try_recv().ok()?;
        self.dark = dark;
        Some(dark)
    }
}

/// Reads the terminal's background from `COLORFGBG` (`"15;0"` = light text on black).
/// Without the variable the terminal is assumed dark.
///
/// The variable is inherited once at process start and terminals send no
/// change notification, so this signal never changes after construction.
/// Feed a [`ChannelAmbient`] from a platform watcher when live updates matter.
#[derive(Debug)]
pub struct TerminalAmbient {
    dark: bool,
}

impl TerminalAmbient {
    pub fn new() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    pub fn from_colorfgbg(value: Option<&str>) -> Self {
        Self {
            dark: value.and_then(parse_colorfgbg).unwrap_or(true),
        }
    }
}

impl Default for TerminalAmbient {
    fn default() -> Self {
        Self::new()
    }
}

/// Background indices 0-6 and 8 are the dark ANSI colors.
fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

impl AmbientSignal for TerminalAmbient {
    fn prefers_dark(&self) -> bool {
        self.dark
    }

    fn next_change(&mut self) -> Option<bool> {
        None
    }
}

/// Resolves a [`ThemeMode`] to an [`Appearance`], tracking the ambient signal.
pub struct ThemeResolver<A: AmbientSignal> {
    ambient: A,
}

impl<A: AmbientSignal> ThemeResolver<A> {
    pub fn new(ambient: A) -> Self {
        Self { ambient }
    }

    /// Drains pending ambient changes. Returns the new appearance when `mode`
    /// follows the system and the effective look flipped.
    pub fn poll(&mut self, mode: ThemeMode) -> Option<Appearance> {
        let before = self.resolve(mode);
        while self.ambient.next_change().is_some() {}
        let after = self.resolve(mode);
        (before != after).then_some(after)
    }

    /// The effective appearance, after taking in any pending ambient change.
    pub fn effective(&mut self, mode: ThemeMode) -> Appearance {
        self.poll(mode);
        self.resolve(mode)
    }

    fn resolve(&self, mode: ThemeMode) -> Appearance {
        match mode {
            ThemeMode::Dark => Appearance::Dark,
            ThemeMode::Light => Appearance::Light,
            ThemeMode::System => Appearance::from_dark(self.ambient.prefers_dark()),
        }
    }

    /// One-line description of the theme state for settings screens.
    pub fn subtitle(&mut self, mode: ThemeMode) -> String {
        match mode {
            ThemeMode::System => {
                let active = if self.effective(mode).is_dark() { "dark" } else { "light" };
                format!("System · {} active", active)
            }
            ThemeMode::Dark => "Forced dark mode".to_string(),
            ThemeMode::Light => "Forced light mode".to_string(),
        }
    }
}
