//! Compute everything the page displays from the current state
//!
//! [`render`] has no memory of earlier renders; calling it twice with the
//! same state gives the same [`View`].

use chrono::{Local, TimeZone};

use crate::{
    format::{
        format_accuracy, format_altitude, format_dms, format_speed, format_timestamp_in,
        hemisphere_label, Axis, SENTINEL,
    },
    i18n::Language,
    position::{PositionReading, Status},
    preferences::{LayoutSlider, Preferences, Theme},
};

/// The state the page is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppState {
    /// The most recent fix, cleared on error.
    pub reading: Option<PositionReading>,
    /// The feed status.
    pub status: Status,
    /// The active preferences.
    pub preferences: Preferences,
    /// Is the settings panel open?
    pub settings_open: bool,
}

/// One coordinate readout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateView {
    /// e.g. `Longitude (East)`.
    pub label: String,
    /// e.g. `121°28′25.32″`, or `-`.
    pub dms: String,
}

/// The status banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Localized message.
    pub message: String,
    /// Show the retry action.
    pub retry: bool,
}

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Active language.
    pub language: Language,
    /// Active theme.
    pub theme: Theme,
    /// Longitude readout.
    pub longitude: CoordinateView,
    /// Latitude readout.
    pub latitude: CoordinateView,
    /// Altitude readout.
    pub altitude: String,
    /// Speed readout.
    pub speed: String,
    /// Fix time readout.
    pub timestamp: String,
    /// Accuracy readout.
    pub accuracy: String,
    /// Speed module visible.
    pub show_speed: bool,
    /// Timestamp and accuracy modules visible.
    pub show_details: bool,
    /// Banner, if one should be shown.
    pub status: Option<StatusView>,
    /// CSS custom properties to set on the document element.
    pub css_vars: Vec<(&'static str, String)>,
    /// Settings panel open.
    pub settings_open: bool,
    /// Accessible label for the menu button.
    pub menu_label: String,
}

fn coordinate(language: Language, label_key: &str, value: Option<f64>, axis: Axis) -> CoordinateView {
    let hemisphere = match hemisphere_label(value, axis) {
        SENTINEL => SENTINEL,
        key => language.t(key),
    };
    CoordinateView {
        label: language.bracketed(language.t(label_key), hemisphere),
        dms: format_dms(value),
    }
}

/// Render the state with timestamps in the given timezone.
#[must_use]
pub fn render_in<Tz>(state: &AppState, tz: &Tz) -> View
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let prefs = &state.preferences;
    let language = prefs.language;
    let reading = state.reading.as_ref();

    let status = state.status.message_key().map(|key| StatusView {
        message: language.t(key).to_string(),
        retry: state.status.can_retry(),
    });

    let css_vars = LayoutSlider::ALL
        .iter()
        .map(|slider| (slider.css_var(), format!("{}px", prefs.layout.get(*slider))))
        .collect();

    let menu_key = if state.settings_open {
        "nav.close"
    } else {
        "nav.menu"
    };

    View {
        language,
        theme: prefs.theme,
        longitude: coordinate(
            language,
            "label.longitude",
            reading.map(|r| r.longitude),
            Axis::Longitude,
        ),
        latitude: coordinate(
            language,
            "label.latitude",
            reading.map(|r| r.latitude),
            Axis::Latitude,
        ),
        altitude: format_altitude(reading.and_then(|r| r.altitude), language),
        speed: format_speed(reading.and_then(|r| r.speed), prefs.speed_unit, language),
        timestamp: format_timestamp_in(reading.map(|r| r.timestamp), tz),
        accuracy: format_accuracy(reading.and_then(|r| r.accuracy), language),
        show_speed: prefs.show_speed,
        show_details: prefs.show_details,
        status,
        css_vars,
        settings_open: state.settings_open,
        menu_label: language.t(menu_key).to_string(),
    }
}

/// Render the state with timestamps in local time.
#[must_use]
pub fn render(state: &AppState) -> View {
    render_in(state, &Local)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::Utc;

    use super::*;
    use crate::{feed::tests::READING, format::SpeedUnit};

    fn state(reading: Option<PositionReading>, status: Status, language: Language) -> AppState {
        let mut preferences = Preferences::default();
        preferences.language = language;
        AppState {
            reading,
            status,
            preferences,
            settings_open: false,
        }
    }

    #[test]
    fn test_render_reading() {
        let view = render_in(&state(Some(READING), Status::Ready, Language::En), &Utc);
        assert_eq!(view.longitude.dms, "121°28′25.32″");
        assert_eq!(view.longitude.label, "Longitude (East)");
        assert_eq!(view.latitude.dms, "31°13′49.44″");
        assert_eq!(view.latitude.label, "Latitude (North)");
        assert_eq!(view.altitude, "4.20 m");
        assert_eq!(view.speed, "10.01 km/h");
        assert_eq!(view.accuracy, "± 12 m");
        assert_eq!(view.timestamp, "03:04:05");
        assert_eq!(view.status, None);
        assert_eq!(view.menu_label, "Open settings");
    }

    #[test]
    fn test_render_chinese_labels() {
        let view = render_in(&state(Some(READING), Status::Ready, Language::Zh), &Utc);
        assert_eq!(view.longitude.label, "经度（东经）");
        assert_eq!(view.latitude.label, "纬度（北纬）");
        assert_eq!(view.menu_label, "打开设置");
    }

    #[test]
    fn test_render_without_reading_uses_sentinels() {
        let view = render_in(&state(None, Status::PermissionDenied, Language::En), &Utc);
        assert_eq!(view.longitude.dms, "-");
        assert_eq!(view.longitude.label, "Longitude (-)");
        assert_eq!(view.latitude.label, "Latitude (-)");
        assert_eq!(view.altitude, "- m");
        assert_eq!(view.speed, "- km/h");
        assert_eq!(view.timestamp, "-");
        assert_eq!(view.accuracy, "-");
        let status = view.status.unwrap();
        assert!(status.retry);
        assert_eq!(
            status.message,
            "Location access denied. Please enable it in browser settings."
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut s = state(Some(READING), Status::Ready, Language::Zh);
        s.preferences.speed_unit = SpeedUnit::MeterPerSecond;
        s.settings_open = true;
        let first = render_in(&s, &Utc);
        let second = render_in(&s, &Utc);
        assert_eq!(first, second);
        assert_eq!(first.speed, "2.78 m/s");
        assert_eq!(first.menu_label, "关闭设置");
    }

    #[test]
    fn test_render_requesting_has_no_retry() {
        let view = render_in(&state(None, Status::Requesting, Language::En), &Utc);
        let status = view.status.unwrap();
        assert!(!status.retry);
        assert_eq!(status.message, "Requesting location…");

        let view = render_in(&state(None, Status::Unsupported, Language::En), &Utc);
        assert!(!view.status.unwrap().retry);
    }

    #[test]
    fn test_render_visibility_and_layout() {
        let mut s = state(Some(READING), Status::Ready, Language::En);
        s.preferences.show_speed = false;
        s.preferences.show_details = false;
        s.preferences.layout.module_gap = 40;
        let view = render_in(&s, &Utc);

        // Hidden modules are still computed.
        assert!(!view.show_speed);
        assert!(!view.show_details);
        assert_eq!(view.speed, "10.01 km/h");
        assert_eq!(
            view.css_vars,
            vec![
                ("--gap-y", "40px".to_string()),
                ("--big-size", "48px".to_string()),
                ("--padding-x", "20px".to_string()),
            ]
        );
    }
}
