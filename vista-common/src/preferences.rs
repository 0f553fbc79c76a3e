//! User preferences, persisted as independent string entries
//!
//! The [`PreferenceStore`] never fails: when the backing store is missing or
//! rejects a write the value is kept in memory for the rest of the session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{format::SpeedUnit, i18n::Language};

/// Errors from a key value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// There is no store, or it is disabled.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation, e.g. over quota.
    #[error("Storage operation on {key} failed: {message}")]
    Failed {
        /// The key being accessed.
        key: String,
        /// What went wrong.
        message: String,
    },
}

/// A persistent string to string store.
pub trait KeyValueStore {
    /// Get a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the removal.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// A store that lives only as long as the page.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// The persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    /// Interface language.
    Language,
    /// Light or dark colours.
    Theme,
    /// Show the timestamp and accuracy readouts.
    ShowDetails,
    /// Show the speed readout.
    ShowSpeed,
    /// Unit for the speed readout.
    SpeedUnit,
    /// Vertical gap between modules.
    ModuleGap,
    /// Font size of the large readouts.
    ValueFontSize,
    /// Horizontal padding of the content.
    ContentPadding,
}

impl PrefKey {
    /// The storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PrefKey::Language => "vista-lang",
            PrefKey::Theme => "vista-theme",
            PrefKey::ShowDetails => "vista-show-details",
            PrefKey::ShowSpeed => "vista-show-speed",
            PrefKey::SpeedUnit => "vista-speed-unit",
            PrefKey::ModuleGap => "vista-module-gap",
            PrefKey::ValueFontSize => "vista-large-value-size",
            PrefKey::ContentPadding => "vista-padding-x",
        }
    }
}

/// Failure tolerant wrapper around a [`KeyValueStore`].
pub struct PreferenceStore<S> {
    backend: Option<S>,
    session: MemoryStore,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Wrap a store.
    pub fn new(backend: S) -> Self {
        Self {
            backend: Some(backend),
            session: MemoryStore::new(),
        }
    }

    /// A store that remembers values for this session only.
    #[must_use]
    pub fn session_only() -> Self {
        Self {
            backend: None,
            session: MemoryStore::new(),
        }
    }

    /// Is a persistent store attached?
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    /// Get a value, preferring anything written during this session.
    #[must_use]
    pub fn get(&self, key: PrefKey) -> Option<String> {
        let key = key.as_str();
        if let Ok(Some(value)) = self.session.get(key) {
            return Some(value);
        }
        let backend = self.backend.as_ref()?;
        backend.get(key).unwrap_or_else(|err| {
            warn!("Failed to read preference {key}: {err}");
            None
        })
    }

    /// Set a value. Persistence failures are logged and ignored.
    pub fn set(&mut self, key: PrefKey, value: &str) {
        let key = key.as_str();
        debug!("Setting preference {key} to {value}");
        // A memory store never fails.
        let _ = self.session.set(key, value);
        if let Some(backend) = &mut self.backend {
            if let Err(err) = backend.set(key, value) {
                warn!("Failed to save preference {key}: {err}");
            }
        }
    }

    /// Remove a value. Persistence failures are logged and ignored.
    pub fn remove(&mut self, key: PrefKey) {
        let key = key.as_str();
        let _ = self.session.remove(key);
        if let Some(backend) = &mut self.backend {
            if let Err(err) = backend.remove(key) {
                warn!("Failed to remove preference {key}: {err}");
            }
        }
    }
}

/// Light or dark colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Theme {
    /// Every theme, in the order shown to the user.
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    /// The stored value and `data-theme` attribute.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored value.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// The localization key for this theme.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Theme::Light => "settings.themeLight",
            Theme::Dark => "settings.themeDark",
        }
    }
}

/// One of the layout sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutSlider {
    /// Vertical gap between modules.
    ModuleGap,
    /// Font size of the large readouts.
    ValueFontSize,
    /// Horizontal padding of the content.
    ContentPadding,
}

impl LayoutSlider {
    /// Every slider, in the order shown to the user.
    pub const ALL: [LayoutSlider; 3] = [
        LayoutSlider::ModuleGap,
        LayoutSlider::ValueFontSize,
        LayoutSlider::ContentPadding,
    ];

    /// Where this slider is stored.
    #[must_use]
    pub const fn key(self) -> PrefKey {
        match self {
            LayoutSlider::ModuleGap => PrefKey::ModuleGap,
            LayoutSlider::ValueFontSize => PrefKey::ValueFontSize,
            LayoutSlider::ContentPadding => PrefKey::ContentPadding,
        }
    }

    /// Value in pixels when nothing usable is stored.
    #[must_use]
    pub const fn default_px(self) -> i32 {
        match self {
            LayoutSlider::ModuleGap => 24,
            LayoutSlider::ValueFontSize => 48,
            LayoutSlider::ContentPadding => 20,
        }
    }

    /// Inclusive pixel range.
    #[must_use]
    pub const fn range(self) -> (i32, i32) {
        match self {
            LayoutSlider::ModuleGap => (8, 64),
            LayoutSlider::ValueFontSize => (24, 96),
            LayoutSlider::ContentPadding => (8, 48),
        }
    }

    /// The CSS custom property driven by this slider.
    #[must_use]
    pub const fn css_var(self) -> &'static str {
        match self {
            LayoutSlider::ModuleGap => "--gap-y",
            LayoutSlider::ValueFontSize => "--big-size",
            LayoutSlider::ContentPadding => "--padding-x",
        }
    }

    /// The localization key for the slider label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            LayoutSlider::ModuleGap => "settings.moduleGap",
            LayoutSlider::ValueFontSize => "settings.valueFontSize",
            LayoutSlider::ContentPadding => "settings.contentPadding",
        }
    }

    /// The DOM id of the slider input.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            LayoutSlider::ModuleGap => "spacing-slider",
            LayoutSlider::ValueFontSize => "value-size-slider",
            LayoutSlider::ContentPadding => "padding-slider",
        }
    }

    /// Clamp a value into range.
    #[must_use]
    pub fn clamp(self, px: i32) -> i32 {
        let (min, max) = self.range();
        px.clamp(min, max)
    }

    /// Parse a stored or entered value, falling back to the default.
    #[must_use]
    pub fn parse(self, value: Option<&str>) -> i32 {
        value
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map_or_else(|| self.default_px(), |px| self.clamp(px))
    }
}

/// Pixel sizes of the adjustable layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Vertical gap between modules.
    pub module_gap: i32,
    /// Font size of the large readouts.
    pub value_font_size: i32,
    /// Horizontal padding of the content.
    pub content_padding: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            module_gap: LayoutSlider::ModuleGap.default_px(),
            value_font_size: LayoutSlider::ValueFontSize.default_px(),
            content_padding: LayoutSlider::ContentPadding.default_px(),
        }
    }
}

impl Layout {
    /// Get the value of a slider.
    #[must_use]
    pub const fn get(&self, slider: LayoutSlider) -> i32 {
        match slider {
            LayoutSlider::ModuleGap => self.module_gap,
            LayoutSlider::ValueFontSize => self.value_font_size,
            LayoutSlider::ContentPadding => self.content_padding,
        }
    }

    fn slot(&mut self, slider: LayoutSlider) -> &mut i32 {
        match slider {
            LayoutSlider::ModuleGap => &mut self.module_gap,
            LayoutSlider::ValueFontSize => &mut self.value_font_size,
            LayoutSlider::ContentPadding => &mut self.content_padding,
        }
    }
}

/// A change made by the user in the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    /// Switch language.
    Language(Language),
    /// Switch theme.
    Theme(Theme),
    /// Show or hide the timestamp and accuracy readouts.
    ShowDetails(bool),
    /// Show or hide the speed readout.
    ShowSpeed(bool),
    /// Switch speed unit.
    SpeedUnit(SpeedUnit),
    /// Move a layout slider.
    Layout(LayoutSlider, i32),
}

/// Defaults that depend on the environment rather than on the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    /// Language when none is stored.
    pub language: Language,
    /// Theme when none is stored, usually from `prefers-color-scheme`.
    pub theme: Theme,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            language: Language::DEFAULT,
            theme: Theme::Light,
        }
    }
}

/// The active set of preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    /// Interface language.
    pub language: Language,
    /// Colours.
    pub theme: Theme,
    /// Show the timestamp and accuracy readouts.
    pub show_details: bool,
    /// Show the speed readout.
    pub show_speed: bool,
    /// Unit for the speed readout.
    pub speed_unit: SpeedUnit,
    /// Adjustable layout.
    pub layout: Layout,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::from_defaults(Defaults::default())
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    value != Some("false")
}

const fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

impl Preferences {
    /// Preferences with nothing stored.
    #[must_use]
    pub fn from_defaults(defaults: Defaults) -> Self {
        Self {
            language: defaults.language,
            theme: defaults.theme,
            show_details: true,
            show_speed: true,
            speed_unit: SpeedUnit::default(),
            layout: Layout::default(),
        }
    }

    /// Load every field independently; missing or malformed values use the default.
    pub fn load<S: KeyValueStore>(store: &PreferenceStore<S>, defaults: Defaults) -> Self {
        let get = |key| store.get(key);

        let language = get(PrefKey::Language)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.language);
        let theme = get(PrefKey::Theme)
            .and_then(|v| Theme::from_tag(&v))
            .unwrap_or(defaults.theme);
        let speed_unit = get(PrefKey::SpeedUnit)
            .and_then(|v| SpeedUnit::from_tag(&v))
            .unwrap_or_default();

        let mut layout = Layout::default();
        for slider in LayoutSlider::ALL {
            *layout.slot(slider) = slider.parse(get(slider.key()).as_deref());
        }

        Self {
            language,
            theme,
            show_details: parse_flag(get(PrefKey::ShowDetails).as_deref()),
            show_speed: parse_flag(get(PrefKey::ShowSpeed).as_deref()),
            speed_unit,
            layout,
        }
    }

    /// Write a change through to the store, then apply it.
    ///
    /// Returns `true` if anything changed.
    pub fn apply<S: KeyValueStore>(
        &mut self,
        change: PreferenceChange,
        store: &mut PreferenceStore<S>,
    ) -> bool {
        let before = *self;
        match change {
            PreferenceChange::Language(language) => {
                store.set(PrefKey::Language, language.tag());
                self.language = language;
            }
            PreferenceChange::Theme(theme) => {
                store.set(PrefKey::Theme, theme.tag());
                self.theme = theme;
            }
            PreferenceChange::ShowDetails(show) => {
                store.set(PrefKey::ShowDetails, flag(show));
                self.show_details = show;
            }
            PreferenceChange::ShowSpeed(show) => {
                store.set(PrefKey::ShowSpeed, flag(show));
                self.show_speed = show;
            }
            PreferenceChange::SpeedUnit(unit) => {
                store.set(PrefKey::SpeedUnit, unit.tag());
                self.speed_unit = unit;
            }
            PreferenceChange::Layout(slider, px) => {
                let px = slider.clamp(px);
                store.set(slider.key(), &px.to_string());
                *self.layout.slot(slider) = px;
            }
        }
        *self != before
    }
}
