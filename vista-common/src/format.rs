//! Turn raw sensor values into display strings
//!
//! Every function here is total: absent, `NaN` and infinite inputs produce a
//! sentinel rather than an error or a `NaN` in the output.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Shown in place of a value that is not known.
pub const SENTINEL: &str = "-";

/// Unit for the speed readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedUnit {
    /// Kilometers per hour.
    #[default]
    #[serde(rename = "kmh")]
    KmPerHour,

    /// Meters per second.
    #[serde(rename = "ms")]
    MeterPerSecond,
}

impl SpeedUnit {
    /// Every unit, in the order shown to the user.
    pub const ALL: [SpeedUnit; 2] = [SpeedUnit::KmPerHour, SpeedUnit::MeterPerSecond];

    /// The value stored for this unit.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            SpeedUnit::KmPerHour => "kmh",
            SpeedUnit::MeterPerSecond => "ms",
        }
    }

    /// Parse a stored value.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "kmh" => Some(SpeedUnit::KmPerHour),
            "ms" => Some(SpeedUnit::MeterPerSecond),
            _ => None,
        }
    }

    /// The localization key for the unit suffix.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            SpeedUnit::KmPerHour => "units.kmh",
            SpeedUnit::MeterPerSecond => "units.ms",
        }
    }

    /// Convert meters per second into this unit.
    #[must_use]
    pub fn convert(self, meters_per_second: f64) -> f64 {
        match self {
            SpeedUnit::KmPerHour => meters_per_second * 3.6,
            SpeedUnit::MeterPerSecond => meters_per_second,
        }
    }
}

/// Which coordinate a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// East/West.
    Longitude,

    /// North/South.
    Latitude,
}

/// The half of the globe a coordinate lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    /// Longitude >= 0.
    East,
    /// Longitude < 0.
    West,
    /// Latitude >= 0.
    North,
    /// Latitude < 0.
    South,
}

impl Hemisphere {
    /// Classify a coordinate. Zero belongs to East or North.
    #[must_use]
    pub fn of(value: Option<f64>, axis: Axis) -> Option<Self> {
        let value = finite(value)?;
        let positive = value >= 0.0;
        Some(match (axis, positive) {
            (Axis::Longitude, true) => Hemisphere::East,
            (Axis::Longitude, false) => Hemisphere::West,
            (Axis::Latitude, true) => Hemisphere::North,
            (Axis::Latitude, false) => Hemisphere::South,
        })
    }

    /// The localization key for this hemisphere.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Hemisphere::East => "hemisphere.lonEast",
            Hemisphere::West => "hemisphere.lonWest",
            Hemisphere::North => "hemisphere.latNorth",
            Hemisphere::South => "hemisphere.latSouth",
        }
    }
}

/// The localization key for the hemisphere of a coordinate, or [`SENTINEL`].
#[must_use]
pub fn hemisphere_label(value: Option<f64>, axis: Axis) -> &'static str {
    Hemisphere::of(value, axis).map_or(SENTINEL, Hemisphere::key)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Degrees, minutes and seconds of an angle, sign dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    /// Whole degrees.
    pub degrees: u32,
    /// Whole minutes, 0 to 59.
    pub minutes: u32,
    /// Seconds rounded to hundredths, below 60.
    pub seconds: f64,
}

impl Dms {
    /// Split decimal degrees, carrying rounding overflow into minutes and degrees.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_degrees(value: f64) -> Option<Self> {
        let absolute = finite(Some(value))?.abs();
        let mut degrees = absolute.floor();
        let minutes_float = (absolute - degrees) * 60.0;
        let mut minutes = minutes_float.floor();
        let mut seconds = ((minutes_float - minutes) * 60.0 * 100.0).round() / 100.0;

        if seconds >= 60.0 {
            seconds -= 60.0;
            minutes += 1.0;
        }
        if minutes >= 60.0 {
            minutes -= 60.0;
            degrees += 1.0;
        }

        Some(Dms {
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds,
        })
    }

    /// Decimal degrees represented by this value.
    #[must_use]
    pub fn to_degrees(self) -> f64 {
        f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + self.seconds / 3600.0
    }
}

impl std::fmt::Display for Dms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}°{:02}′{:05.2}″",
            self.degrees, self.minutes, self.seconds
        )
    }
}

/// Format decimal degrees as `DD°MM′SS.ss″`.
#[must_use]
pub fn format_dms(value: Option<f64>) -> String {
    value
        .and_then(Dms::from_degrees)
        .map_or_else(|| SENTINEL.to_string(), |dms| dms.to_string())
}

/// Format an altitude in meters, e.g. `4.20 m`.
#[must_use]
pub fn format_altitude(meters: Option<f64>, language: Language) -> String {
    let unit = language.t("units.meter");
    match finite(meters) {
        Some(meters) => format!("{meters:.2} {unit}"),
        None => format!("{SENTINEL} {unit}"),
    }
}

/// Format a speed given in meters per second, e.g. `10.01 km/h`.
#[must_use]
pub fn format_speed(meters_per_second: Option<f64>, unit: SpeedUnit, language: Language) -> String {
    let suffix = language.t(unit.label_key());
    match finite(meters_per_second) {
        Some(speed) => format!("{:.2} {suffix}", unit.convert(speed)),
        None => format!("{SENTINEL} {suffix}"),
    }
}

/// Format an accuracy radius, e.g. `± 12 m`.
#[must_use]
pub fn format_accuracy(meters: Option<f64>, language: Language) -> String {
    match finite(meters) {
        Some(meters) => format!("± {} {}", meters.round(), language.t("units.meter")),
        None => SENTINEL.to_string(),
    }
}

/// Format epoch milliseconds as a 24 hour `HH:MM:SS` in the given timezone.
#[must_use]
pub fn format_timestamp_in<Tz>(epoch_millis: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    epoch_millis
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(
            || SENTINEL.to_string(),
            |dt| dt.with_timezone(tz).format("%H:%M:%S").to_string(),
        )
}

/// Format epoch milliseconds as local wall clock time.
#[must_use]
pub fn format_timestamp(epoch_millis: Option<i64>) -> String {
    format_timestamp_in(epoch_millis, &Local)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use approx::assert_abs_diff_eq;
    use chrono_tz::Tz;

    use super::*;

    fn parse_dms(s: &str) -> (u32, u32, f64) {
        let (degrees, rest) = s.split_once('°').unwrap();
        let (minutes, rest) = rest.split_once('′').unwrap();
        let seconds = rest.strip_suffix('″').unwrap();
        assert!(degrees.len() >= 2, "degrees width in {s}");
        assert_eq!(minutes.len(), 2, "minutes width in {s}");
        assert_eq!(seconds.len(), 5, "seconds width in {s}");
        (
            degrees.parse().unwrap(),
            minutes.parse().unwrap(),
            seconds.parse().unwrap(),
        )
    }

    #[test]
    fn test_format_dms_scenario() {
        assert_eq!(format_dms(Some(121.4737)), "121°28′25.32″");
        assert_eq!(format_dms(Some(31.2304)), "31°13′49.44″");
        assert_eq!(format_dms(Some(-0.5)), "00°30′00.00″");
        assert_eq!(format_dms(Some(0.0)), "00°00′00.00″");
        assert_eq!(format_dms(Some(-180.0)), "180°00′00.00″");
    }

    #[test]
    fn test_format_dms_round_trip() {
        let mut value = -180.0;
        while value <= 180.0 {
            let (d, m, s) = parse_dms(&format_dms(Some(value)));
            assert!(m < 60, "minutes overflow for {value}");
            assert!(s < 60.0, "seconds overflow for {value}");
            let back = f64::from(d) + f64::from(m) / 60.0 + s / 3600.0;
            assert_abs_diff_eq!(back, value.abs(), epsilon = 1.0 / 360_000.0);
            value += 0.123_457;
        }
    }

    #[test]
    fn test_format_dms_carries_overflow() {
        // 59′59.999″ rounds up to a whole minute, and then to a whole degree.
        let value = 10.0 + 59.0 / 60.0 + 59.999 / 3600.0;
        assert_eq!(format_dms(Some(value)), "11°00′00.00″");

        let value = 10.0 + 14.0 / 60.0 + 59.996 / 3600.0;
        assert_eq!(format_dms(Some(value)), "10°15′00.00″");
    }

    #[test]
    fn test_format_dms_sentinel() {
        assert_eq!(format_dms(None), "-");
        assert_eq!(format_dms(Some(f64::NAN)), "-");
        assert_eq!(format_dms(Some(f64::INFINITY)), "-");
    }

    #[test]
    fn test_dms_to_degrees() {
        let dms = Dms::from_degrees(-45.5).unwrap();
        assert_eq!(dms.degrees, 45);
        assert_eq!(dms.minutes, 30);
        assert_abs_diff_eq!(dms.to_degrees(), 45.5);
    }

    #[test]
    fn test_format_altitude() {
        assert_eq!(format_altitude(Some(4.2), Language::En), "4.20 m");
        assert_eq!(format_altitude(Some(-12.5), Language::En), "-12.50 m");
        assert_eq!(format_altitude(None, Language::En), "- m");
        assert_eq!(format_altitude(Some(f64::NAN), Language::Zh), "- m");
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(
            format_speed(Some(2.78), SpeedUnit::KmPerHour, Language::En),
            "10.01 km/h"
        );
        assert_eq!(
            format_speed(Some(2.78), SpeedUnit::MeterPerSecond, Language::En),
            "2.78 m/s"
        );
        assert_eq!(
            format_speed(None, SpeedUnit::KmPerHour, Language::En),
            "- km/h"
        );
        assert_eq!(
            format_speed(Some(f64::NAN), SpeedUnit::MeterPerSecond, Language::Zh),
            "- m/s"
        );
    }

    #[test]
    fn test_format_speed_units_agree() {
        let value_of = |s: String| -> f64 { s.split(' ').next().unwrap().parse().unwrap() };
        for i in 0..500 {
            let speed = f64::from(i) * 0.173;
            let kmh = value_of(format_speed(Some(speed), SpeedUnit::KmPerHour, Language::En));
            let ms = value_of(format_speed(
                Some(speed),
                SpeedUnit::MeterPerSecond,
                Language::En,
            ));
            // Each value is rounded to hundredths before comparing.
            assert_abs_diff_eq!(kmh, ms * 3.6, epsilon = 0.025);
        }
    }

    #[test]
    fn test_format_accuracy() {
        assert_eq!(format_accuracy(Some(12.4), Language::En), "± 12 m");
        assert_eq!(format_accuracy(Some(12.5), Language::En), "± 13 m");
        assert_eq!(format_accuracy(Some(0.0), Language::En), "± 0 m");
        assert_eq!(format_accuracy(None, Language::En), "-");
        assert_eq!(format_accuracy(Some(f64::NAN), Language::En), "-");
    }

    #[test]
    fn test_format_timestamp() {
        // 2024-05-16T03:04:05.678Z
        let millis = 1_715_828_645_678;
        assert_eq!(format_timestamp_in(Some(millis), &Utc), "03:04:05");

        let timezone: Tz = "Australia/Melbourne".parse().unwrap();
        assert_eq!(format_timestamp_in(Some(millis), &timezone), "13:04:05");

        let timezone: Tz = "Asia/Shanghai".parse().unwrap();
        assert_eq!(format_timestamp_in(Some(millis), &timezone), "11:04:05");
    }

    #[test]
    fn test_format_timestamp_sentinel() {
        assert_eq!(format_timestamp_in(None, &Utc), "-");
        assert_eq!(format_timestamp_in(Some(i64::MAX), &Utc), "-");
    }

    #[test]
    fn test_hemisphere() {
        assert_eq!(
            hemisphere_label(Some(0.0), Axis::Longitude),
            "hemisphere.lonEast"
        );
        assert_eq!(
            hemisphere_label(Some(0.0), Axis::Latitude),
            "hemisphere.latNorth"
        );
        assert_eq!(
            hemisphere_label(Some(-0.1), Axis::Longitude),
            "hemisphere.lonWest"
        );
        assert_eq!(
            hemisphere_label(Some(-33.9), Axis::Latitude),
            "hemisphere.latSouth"
        );
        assert_eq!(hemisphere_label(None, Axis::Latitude), "-");
        assert_eq!(hemisphere_label(Some(f64::NAN), Axis::Longitude), "-");
    }

    #[test]
    fn test_speed_unit_tags() {
        for unit in SpeedUnit::ALL {
            assert_eq!(SpeedUnit::from_tag(unit.tag()), Some(unit));
        }
        assert_eq!(SpeedUnit::from_tag("mph"), None);
    }
}
