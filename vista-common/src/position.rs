//! Readings and statuses produced by the location provider

use serde::{Deserialize, Serialize};

/// One timestamped sample from the location provider.
///
/// Only the most recent reading is ever held; a new one replaces the old.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionReading {
    /// Degrees, -180 to 180.
    pub longitude: f64,

    /// Degrees, -90 to 90.
    pub latitude: f64,

    /// Meters above the reference ellipsoid, if known.
    pub altitude: Option<f64>,

    /// Meters per second, if known.
    pub speed: Option<f64>,

    /// Radius of the accuracy circle in meters, if known.
    pub accuracy: Option<f64>,

    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
}

/// The current state of the location feed, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// A watch has been requested but no fix has arrived yet.
    Requesting,

    /// The user refused access to their location.
    PermissionDenied,

    /// The provider could not determine a position.
    PositionUnavailable,

    /// The provider did not produce a fix in time.
    Timeout,

    /// There is no location capability on this device.
    Unsupported,

    /// Something else went wrong.
    UnknownError,

    /// A fix has been received.
    Ready,
}

impl Status {
    /// The localization key for the user visible message.
    ///
    /// Returns `None` when no message should be shown.
    #[must_use]
    pub const fn message_key(self) -> Option<&'static str> {
        match self {
            Status::Requesting => Some("status.requesting"),
            Status::PermissionDenied => Some("status.permissionDenied"),
            Status::PositionUnavailable => Some("status.positionUnavailable"),
            Status::Timeout => Some("status.timeout"),
            Status::Unsupported => Some("status.unsupported"),
            Status::UnknownError => Some("status.unknownError"),
            Status::Ready => None,
        }
    }

    /// Can the user usefully retry from this status?
    #[must_use]
    pub const fn can_retry(self) -> bool {
        matches!(
            self,
            Status::PermissionDenied
                | Status::PositionUnavailable
                | Status::Timeout
                | Status::UnknownError
        )
    }
}

/// An error delivered by the location provider on an active watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderError {
    /// Access was refused.
    PermissionDenied,

    /// No position could be determined.
    Unavailable,

    /// No fix within the timeout.
    Timeout,

    /// Anything else.
    Other,
}

impl ProviderError {
    /// Map a W3C `GeolocationPositionError.code` to an error.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            1 => ProviderError::PermissionDenied,
            2 => ProviderError::Unavailable,
            3 => ProviderError::Timeout,
            _ => ProviderError::Other,
        }
    }
}

impl From<ProviderError> for Status {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::PermissionDenied => Status::PermissionDenied,
            ProviderError::Unavailable => Status::PositionUnavailable,
            ProviderError::Timeout => Status::Timeout,
            ProviderError::Other => Status::UnknownError,
        }
    }
}

/// Options passed to the provider when opening a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Ask for the most accurate fix the device can produce.
    pub high_accuracy: bool,

    /// Give up on a fix after this many milliseconds.
    pub timeout_ms: u32,

    /// Accept cached fixes no older than this many milliseconds.
    pub max_cache_age_ms: u32,
}

/// Identifies one watch opened on the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchId(pub i32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ProviderError::from_code(1), ProviderError::PermissionDenied);
        assert_eq!(ProviderError::from_code(2), ProviderError::Unavailable);
        assert_eq!(ProviderError::from_code(3), ProviderError::Timeout);
        assert_eq!(ProviderError::from_code(0), ProviderError::Other);
        assert_eq!(ProviderError::from_code(42), ProviderError::Other);
    }

    #[test]
    fn test_retry() {
        assert!(!Status::Requesting.can_retry());
        assert!(!Status::Unsupported.can_retry());
        assert!(!Status::Ready.can_retry());
        assert!(Status::PermissionDenied.can_retry());
        assert!(Status::Timeout.can_retry());
        assert_eq!(Status::Ready.message_key(), None);
    }
}
