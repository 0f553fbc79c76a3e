//! Owns the application state and applies every change to it

use tracing::debug;

use crate::{
    config::Config,
    feed::{FeedEvent, LocationProvider, PositionFeed},
    preferences::{Defaults, KeyValueStore, PreferenceChange, PreferenceStore, Preferences},
    view::{render, AppState, View},
};

/// Something that happened to the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Msg {
    /// The location provider pushed an event.
    Feed(FeedEvent),
    /// The user changed a setting.
    Preference(PreferenceChange),
    /// The user asked to try again.
    Retry,
    /// The page became visible (`true`) or hidden.
    Visibility(bool),
    /// Open, close (`Some`) or toggle (`None`) the settings panel.
    Settings(Option<bool>),
    /// The page is being unloaded.
    Teardown,
}

/// The single owner of the current reading, status and preferences.
pub struct Controller<P, S> {
    feed: PositionFeed<P>,
    store: PreferenceStore<S>,
    preferences: Preferences,
    settings_open: bool,
}

impl<P: LocationProvider, S: KeyValueStore> Controller<P, S> {
    /// Load preferences and create an idle feed.
    pub fn new(
        provider: P,
        store: PreferenceStore<S>,
        config: &Config,
        defaults: Defaults,
    ) -> Self {
        let defaults = Defaults {
            language: config.default_language,
            ..defaults
        };
        let preferences = Preferences::load(&store, defaults);
        debug!("Loaded preferences: {preferences:?}");
        Self {
            feed: PositionFeed::new(provider, config.watch.options()),
            store,
            preferences,
            settings_open: false,
        }
    }

    /// Start watching the location provider.
    pub fn start(&mut self) {
        self.feed.start();
    }

    /// Apply a message. Returns `true` if the page needs to be drawn again.
    pub fn update(&mut self, msg: Msg) -> bool {
        let before = self.state();
        match msg {
            Msg::Feed(event) => self.feed.handle(event),
            Msg::Preference(change) => {
                self.preferences.apply(change, &mut self.store);
            }
            Msg::Retry => {
                self.settings_open = false;
                self.feed.start();
            }
            Msg::Visibility(visible) => self.feed.set_visible(visible),
            Msg::Settings(open) => {
                self.settings_open = open.unwrap_or(!self.settings_open);
            }
            Msg::Teardown => self.feed.teardown(),
        }
        self.state() != before
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> AppState {
        AppState {
            reading: self.feed.reading().copied(),
            status: self.feed.status(),
            preferences: self.preferences,
            settings_open: self.settings_open,
        }
    }

    /// The current preferences.
    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The location feed.
    #[must_use]
    pub const fn feed(&self) -> &PositionFeed<P> {
        &self.feed
    }

    /// Draw the current state.
    #[must_use]
    pub fn view(&self) -> View {
        render(&self.state())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{
        feed::{
            tests::{FakeProvider, READING},
            FeedEventKind, FeedState,
        },
        format::SpeedUnit,
        i18n::Language,
        position::{ProviderError, Status, WatchId},
        preferences::{MemoryStore, PrefKey, Theme},
    };

    fn controller() -> Controller<FakeProvider, MemoryStore> {
        let mut controller = Controller::new(
            FakeProvider::supported(),
            PreferenceStore::new(MemoryStore::new()),
            &Config::default(),
            Defaults::default(),
        );
        controller.start();
        controller
    }

    fn fix(watch: i32) -> Msg {
        Msg::Feed(FeedEvent {
            watch: WatchId(watch),
            kind: FeedEventKind::Position(READING),
        })
    }

    #[test]
    fn test_reading_then_unit_change() {
        let mut c = controller();
        assert!(c.update(fix(1)));
        assert_eq!(c.state().status, Status::Ready);
        assert_eq!(c.view().speed, "10.01 km/h");

        assert!(c.update(Msg::Preference(PreferenceChange::SpeedUnit(
            SpeedUnit::MeterPerSecond
        ))));
        assert_eq!(c.view().speed, "2.78 m/s");

        // Same fix again changes nothing.
        assert!(!c.update(fix(1)));
    }

    #[test]
    fn test_permission_denied_scenario() {
        let mut c = controller();
        c.update(fix(1));
        c.update(Msg::Feed(FeedEvent {
            watch: WatchId(1),
            kind: FeedEventKind::Error(ProviderError::PermissionDenied),
        }));

        let state = c.state();
        assert_eq!(state.status, Status::PermissionDenied);
        assert_eq!(state.reading, None);
        assert_eq!(c.view().longitude.dms, "-");
        assert_eq!(c.feed().state(), FeedState::Idle);

        c.update(Msg::Visibility(false));
        c.update(Msg::Visibility(true));
        assert_eq!(c.feed().provider().calls, vec!["watch 1", "clear 1"]);

        // Retry closes the settings panel and starts again.
        c.update(Msg::Settings(Some(true)));
        c.update(Msg::Retry);
        assert!(!c.state().settings_open);
        assert_eq!(c.state().status, Status::Requesting);
        assert_eq!(c.feed().provider().open, vec![WatchId(2)]);
    }

    #[test]
    fn test_preferences_persist() {
        let mut c = controller();
        c.update(Msg::Preference(PreferenceChange::Language(Language::En)));
        c.update(Msg::Preference(PreferenceChange::Theme(Theme::Dark)));
        assert_eq!(c.preferences().language, Language::En);
        assert_eq!(c.store.get(PrefKey::Language).as_deref(), Some("en"));
        assert_eq!(c.store.get(PrefKey::Theme).as_deref(), Some("dark"));
        assert_eq!(c.view().menu_label, "Open settings");
    }

    #[test]
    fn test_settings_toggle() {
        let mut c = controller();
        assert!(c.update(Msg::Settings(None)));
        assert!(c.state().settings_open);
        assert!(!c.update(Msg::Settings(Some(true))));
        assert!(c.update(Msg::Settings(None)));
        assert!(!c.state().settings_open);
    }

    #[test]
    fn test_config_default_language() {
        let config = Config {
            default_language: Language::En,
            ..Config::default()
        };
        let c: Controller<FakeProvider, MemoryStore> = Controller::new(
            FakeProvider::supported(),
            PreferenceStore::session_only(),
            &config,
            Defaults::default(),
        );
        assert_eq!(c.preferences().language, Language::En);
        assert_eq!(c.feed().options().timeout_ms, 8_000);
    }

    #[test]
    fn test_teardown() {
        let mut c = controller();
        c.update(Msg::Teardown);
        assert!(c.feed().provider().open.is_empty());
    }

    #[test]
    fn test_restored_page_watches_again() {
        let mut c = controller();
        c.update(fix(1));
        c.update(Msg::Teardown);
        c.update(Msg::Visibility(false));
        assert!(c.update(Msg::Visibility(true)));

        assert_eq!(c.feed().provider().open, vec![WatchId(2)]);
        assert_eq!(
            c.feed().provider().calls,
            vec!["watch 1", "clear 1", "watch 2"]
        );
        assert_eq!(c.state().status, Status::Requesting);
        assert!(c.view().status.is_some());
    }
}
